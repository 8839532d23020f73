//! Token types produced by the scanner.

use std::fmt;
use std::sync::OnceLock;

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use vbsyntax_core::{LanguageVersion, Span, SyntaxErrorKind};

use super::chars::half_width;

/// A token from the source code.
///
/// Equality is structural: two tokens are equal when kind, span and payload
/// all match. Text payloads live in the parse arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token<'ast> {
    /// The type of token. Identifiers spelled like a reserved keyword carry
    /// the keyword kind here.
    pub kind: TokenKind,
    /// Location in source.
    pub span: Span,
    /// Variant-specific payload.
    pub value: TokenValue<'ast>,
}

impl<'ast> Token<'ast> {
    #[inline]
    pub fn new(kind: TokenKind, span: Span, value: TokenValue<'ast>) -> Self {
        Self { kind, span, value }
    }

    /// Identifier payload, for identifiers and keywords.
    #[inline]
    pub fn identifier(&self) -> Option<&IdentifierValue<'ast>> {
        match &self.value {
            TokenValue::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    /// The keyword this token spells, reserved or not. Returns
    /// `TokenKind::Identifier` for plain and escaped identifiers.
    #[inline]
    pub fn unreserved(&self) -> TokenKind {
        match &self.value {
            TokenValue::Identifier(ident) => ident.unreserved,
            _ => self.kind,
        }
    }

    /// Whether this is an identifier token spelling the given contextual
    /// keyword.
    #[inline]
    pub fn is_contextual(&self, keyword: TokenKind) -> bool {
        self.kind == TokenKind::Identifier && self.unreserved() == keyword
    }

    /// Type character attached to an identifier or numeric literal.
    pub fn type_character(&self) -> TypeCharacter {
        match self.value {
            TokenValue::Identifier(ident) => ident.type_char,
            TokenValue::Integer { type_char, .. }
            | TokenValue::UnsignedInteger { type_char, .. }
            | TokenValue::FloatingPoint { type_char, .. }
            | TokenValue::Decimal { type_char, .. } => type_char,
            _ => TypeCharacter::None,
        }
    }

    /// Whether the token ends a logical statement.
    #[inline]
    pub fn is_end_of_statement(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Colon | TokenKind::LineTerminator | TokenKind::EndOfStream | TokenKind::Comment
        )
    }

    /// Whether the token ends a physical line.
    #[inline]
    pub fn is_end_of_line(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::LineTerminator | TokenKind::EndOfStream | TokenKind::Comment
        )
    }

    /// The diagnostic carried by a lexical error token.
    #[inline]
    pub fn error(&self) -> Option<SyntaxErrorKind> {
        match self.value {
            TokenValue::Error(kind) => Some(kind),
            _ => None,
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            TokenValue::None => write!(f, "{:?} @ {:?}", self.kind, self.span),
            value => write!(f, "{:?}({:?} @ {:?})", self.kind, value, self.span),
        }
    }
}

/// Payload of an identifier or keyword token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdentifierValue<'ast> {
    /// Identifier text as written, without brackets or type character.
    pub text: &'ast str,
    pub type_char: TypeCharacter,
    /// Written as `[name]`.
    pub escaped: bool,
    /// The keyword this identifier spells, reserved or contextual, or
    /// `TokenKind::Identifier`.
    pub unreserved: TokenKind,
}

/// Variant-specific token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenValue<'ast> {
    /// Punctuators, line terminators and end of stream.
    None,
    Identifier(IdentifierValue<'ast>),
    /// Signed integer; hex and octal literals hold the bit pattern
    /// reinterpreted at the literal's width.
    Integer {
        value: i64,
        base: IntegerBase,
        type_char: TypeCharacter,
    },
    UnsignedInteger {
        value: u64,
        base: IntegerBase,
        type_char: TypeCharacter,
    },
    FloatingPoint {
        value: OrderedFloat<f64>,
        type_char: TypeCharacter,
    },
    Decimal {
        value: DecimalValue,
        type_char: TypeCharacter,
    },
    Character(char),
    String(&'ast str),
    Date(DateValue),
    Comment {
        text: &'ast str,
        is_rem: bool,
    },
    /// A lexical error token.
    Error(SyntaxErrorKind),
}

/// Radix of an integer literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerBase {
    Decimal,
    Octal,
    Hexadecimal,
}

/// A type-character suffix on an identifier or literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypeCharacter {
    #[default]
    None,
    /// `%`
    IntegerSymbol,
    /// `&`
    LongSymbol,
    /// `@`
    DecimalSymbol,
    /// `!`
    SingleSymbol,
    /// `#`
    DoubleSymbol,
    /// `$`
    StringSymbol,
    /// `S`
    ShortChar,
    /// `US`
    UnsignedShortChar,
    /// `I`
    IntegerChar,
    /// `UI`
    UnsignedIntegerChar,
    /// `L`
    LongChar,
    /// `UL`
    UnsignedLongChar,
    /// `F`
    SingleChar,
    /// `R`
    DoubleChar,
    /// `D`
    DecimalChar,
}

impl TypeCharacter {
    /// Whether the suffix names an integral type.
    pub fn is_integral(self) -> bool {
        matches!(
            self,
            TypeCharacter::IntegerSymbol
                | TypeCharacter::LongSymbol
                | TypeCharacter::ShortChar
                | TypeCharacter::UnsignedShortChar
                | TypeCharacter::IntegerChar
                | TypeCharacter::UnsignedIntegerChar
                | TypeCharacter::LongChar
                | TypeCharacter::UnsignedLongChar
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            TypeCharacter::UnsignedShortChar
                | TypeCharacter::UnsignedIntegerChar
                | TypeCharacter::UnsignedLongChar
        )
    }

    /// Whether the suffix is a single symbol that may follow an identifier.
    pub fn is_symbol(self) -> bool {
        matches!(
            self,
            TypeCharacter::IntegerSymbol
                | TypeCharacter::LongSymbol
                | TypeCharacter::DecimalSymbol
                | TypeCharacter::SingleSymbol
                | TypeCharacter::DoubleSymbol
                | TypeCharacter::StringSymbol
        )
    }

    /// Symbol suffix for a (half-width) character.
    pub fn from_symbol(c: char) -> Option<TypeCharacter> {
        Some(match c {
            '%' => TypeCharacter::IntegerSymbol,
            '&' => TypeCharacter::LongSymbol,
            '@' => TypeCharacter::DecimalSymbol,
            '!' => TypeCharacter::SingleSymbol,
            '#' => TypeCharacter::DoubleSymbol,
            '$' => TypeCharacter::StringSymbol,
            _ => return None,
        })
    }
}

/// A decimal literal: `mantissa / 10^scale`, mantissa limited to 96 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DecimalValue {
    pub mantissa: u128,
    pub scale: u8,
}

impl DecimalValue {
    pub const MAX_MANTISSA: u128 = (1u128 << 96) - 1;
    pub const MAX_SCALE: u8 = 28;

    pub fn to_f64(self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for DecimalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (int, frac) = padded.split_at(padded.len() - scale);
        write!(f, "{int}.{frac}")
    }
}

/// A date literal's calendar value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateValue {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl DateValue {
    /// Date used for time-only literals.
    pub const EPOCH: DateValue = DateValue {
        year: 1,
        month: 1,
        day: 1,
        hour: 0,
        minute: 0,
        second: 0,
    };
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// All token types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Structure
    // =========================================
    LexicalError,
    EndOfStream,
    LineTerminator,
    Comment,

    // =========================================
    // Identifiers and literals
    // =========================================
    Identifier,
    IntegerLiteral,
    UnsignedIntegerLiteral,
    FloatingPointLiteral,
    DecimalLiteral,
    CharacterLiteral,
    StringLiteral,
    DateLiteral,

    // =========================================
    // Reserved keywords
    // =========================================
    AddHandler,
    AddressOf,
    Alias,
    And,
    AndAlso,
    As,
    Boolean,
    ByRef,
    Byte,
    ByVal,
    Call,
    Case,
    Catch,
    CBool,
    CByte,
    CChar,
    CDate,
    CDbl,
    CDec,
    Char,
    CInt,
    Class,
    CLng,
    CObj,
    Const,
    Continue,
    CSByte,
    CShort,
    CSng,
    CStr,
    CType,
    CUInt,
    CULng,
    CUShort,
    Date,
    Decimal,
    Declare,
    Default,
    Delegate,
    Dim,
    DirectCast,
    Do,
    Double,
    Each,
    Else,
    ElseIf,
    End,
    Enum,
    Erase,
    Error,
    Event,
    Exit,
    False,
    Finally,
    For,
    Friend,
    Function,
    Get,
    GetType,
    Global,
    GoSub,
    GoTo,
    Handles,
    If,
    Implements,
    Imports,
    In,
    Inherits,
    Integer,
    Interface,
    Is,
    IsNot,
    Let,
    Lib,
    Like,
    Long,
    Loop,
    Me,
    Mod,
    Module,
    MustInherit,
    MustOverride,
    MyBase,
    MyClass,
    Namespace,
    Narrowing,
    New,
    Next,
    Not,
    Nothing,
    NotInheritable,
    NotOverridable,
    Object,
    Of,
    On,
    Operator,
    Option,
    Optional,
    Or,
    OrElse,
    Overloads,
    Overridable,
    Overrides,
    ParamArray,
    Partial,
    Private,
    Property,
    Protected,
    Public,
    RaiseEvent,
    ReadOnly,
    ReDim,
    Rem,
    RemoveHandler,
    Resume,
    Return,
    SByte,
    Select,
    Set,
    Shadows,
    Shared,
    Short,
    Single,
    Static,
    Step,
    Stop,
    String,
    Structure,
    Sub,
    SyncLock,
    Then,
    Throw,
    To,
    True,
    Try,
    TryCast,
    TypeOf,
    UInteger,
    ULong,
    UShort,
    Using,
    Wend,
    When,
    While,
    Widening,
    With,
    WithEvents,
    WriteOnly,
    Xor,

    // =========================================
    // Contextual keywords (scanned as identifiers)
    // =========================================
    Ansi,
    Assembly,
    Auto,
    Binary,
    Compare,
    Custom,
    Explicit,
    ExternalChecksum,
    ExternalSource,
    IsFalse,
    IsTrue,
    Mid,
    Off,
    Preserve,
    Region,
    Strict,
    Text,
    Unicode,
    Until,

    // =========================================
    // Punctuators
    // =========================================
    /// `(`
    LeftParenthesis,
    /// `)`
    RightParenthesis,
    /// `{`
    LeftCurlyBrace,
    /// `}`
    RightCurlyBrace,
    /// `!`
    Exclamation,
    /// `#`
    Pound,
    /// `,`
    Comma,
    /// `.`
    Period,
    /// `:`
    Colon,
    /// `:=`
    ColonEquals,
    /// `&`
    Ampersand,
    /// `&=`
    AmpersandEquals,
    /// `*`
    Star,
    /// `*=`
    StarEquals,
    /// `+`
    Plus,
    /// `+=`
    PlusEquals,
    /// `-`
    Minus,
    /// `-=`
    MinusEquals,
    /// `/`
    ForwardSlash,
    /// `/=`
    ForwardSlashEquals,
    /// `\`
    BackwardSlash,
    /// `\=`
    BackwardSlashEquals,
    /// `^`
    Caret,
    /// `^=`
    CaretEquals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanEquals,
    /// `<>`
    NotEquals,
    /// `<<`
    LessThanLessThan,
    /// `<<=`
    LessThanLessThanEquals,
    /// `=`
    Equals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanEquals,
    /// `>>`
    GreaterThanGreaterThan,
    /// `>>=`
    GreaterThanGreaterThanEquals,
    /// `?`
    QuestionMark,
}

/// `(spelling, kind, reserved, introduced in 8.0)`
const KEYWORDS: &[(&str, TokenKind, bool, bool)] = {
    use TokenKind::*;
    &[
        ("AddHandler", AddHandler, true, false),
        ("AddressOf", AddressOf, true, false),
        ("Alias", Alias, true, false),
        ("And", And, true, false),
        ("AndAlso", AndAlso, true, false),
        ("As", As, true, false),
        ("Boolean", Boolean, true, false),
        ("ByRef", ByRef, true, false),
        ("Byte", Byte, true, false),
        ("ByVal", ByVal, true, false),
        ("Call", Call, true, false),
        ("Case", Case, true, false),
        ("Catch", Catch, true, false),
        ("CBool", CBool, true, false),
        ("CByte", CByte, true, false),
        ("CChar", CChar, true, false),
        ("CDate", CDate, true, false),
        ("CDbl", CDbl, true, false),
        ("CDec", CDec, true, false),
        ("Char", Char, true, false),
        ("CInt", CInt, true, false),
        ("Class", Class, true, false),
        ("CLng", CLng, true, false),
        ("CObj", CObj, true, false),
        ("Const", Const, true, false),
        ("Continue", Continue, true, true),
        ("CSByte", CSByte, true, true),
        ("CShort", CShort, true, false),
        ("CSng", CSng, true, false),
        ("CStr", CStr, true, false),
        ("CType", CType, true, false),
        ("CUInt", CUInt, true, true),
        ("CULng", CULng, true, true),
        ("CUShort", CUShort, true, true),
        ("Date", Date, true, false),
        ("Decimal", Decimal, true, false),
        ("Declare", Declare, true, false),
        ("Default", Default, true, false),
        ("Delegate", Delegate, true, false),
        ("Dim", Dim, true, false),
        ("DirectCast", DirectCast, true, false),
        ("Do", Do, true, false),
        ("Double", Double, true, false),
        ("Each", Each, true, false),
        ("Else", Else, true, false),
        ("ElseIf", ElseIf, true, false),
        ("End", End, true, false),
        ("Enum", Enum, true, false),
        ("Erase", Erase, true, false),
        ("Error", Error, true, false),
        ("Event", Event, true, false),
        ("Exit", Exit, true, false),
        ("False", False, true, false),
        ("Finally", Finally, true, false),
        ("For", For, true, false),
        ("Friend", Friend, true, false),
        ("Function", Function, true, false),
        ("Get", Get, true, false),
        ("GetType", GetType, true, false),
        ("Global", Global, true, true),
        ("GoSub", GoSub, true, false),
        ("GoTo", GoTo, true, false),
        ("Handles", Handles, true, false),
        ("If", If, true, false),
        ("Implements", Implements, true, false),
        ("Imports", Imports, true, false),
        ("In", In, true, false),
        ("Inherits", Inherits, true, false),
        ("Integer", Integer, true, false),
        ("Interface", Interface, true, false),
        ("Is", Is, true, false),
        ("IsNot", IsNot, true, true),
        ("Let", Let, true, false),
        ("Lib", Lib, true, false),
        ("Like", Like, true, false),
        ("Long", Long, true, false),
        ("Loop", Loop, true, false),
        ("Me", Me, true, false),
        ("Mod", Mod, true, false),
        ("Module", Module, true, false),
        ("MustInherit", MustInherit, true, false),
        ("MustOverride", MustOverride, true, false),
        ("MyBase", MyBase, true, false),
        ("MyClass", MyClass, true, false),
        ("Namespace", Namespace, true, false),
        ("Narrowing", Narrowing, true, true),
        ("New", New, true, false),
        ("Next", Next, true, false),
        ("Not", Not, true, false),
        ("Nothing", Nothing, true, false),
        ("NotInheritable", NotInheritable, true, false),
        ("NotOverridable", NotOverridable, true, false),
        ("Object", Object, true, false),
        ("Of", Of, true, true),
        ("On", On, true, false),
        ("Operator", Operator, true, true),
        ("Option", Option, true, false),
        ("Optional", Optional, true, false),
        ("Or", Or, true, false),
        ("OrElse", OrElse, true, false),
        ("Overloads", Overloads, true, false),
        ("Overridable", Overridable, true, false),
        ("Overrides", Overrides, true, false),
        ("ParamArray", ParamArray, true, false),
        ("Partial", Partial, true, true),
        ("Private", Private, true, false),
        ("Property", Property, true, false),
        ("Protected", Protected, true, false),
        ("Public", Public, true, false),
        ("RaiseEvent", RaiseEvent, true, false),
        ("ReadOnly", ReadOnly, true, false),
        ("ReDim", ReDim, true, false),
        ("REM", Rem, true, false),
        ("RemoveHandler", RemoveHandler, true, false),
        ("Resume", Resume, true, false),
        ("Return", Return, true, false),
        ("SByte", SByte, true, true),
        ("Select", Select, true, false),
        ("Set", Set, true, false),
        ("Shadows", Shadows, true, false),
        ("Shared", Shared, true, false),
        ("Short", Short, true, false),
        ("Single", Single, true, false),
        ("Static", Static, true, false),
        ("Step", Step, true, false),
        ("Stop", Stop, true, false),
        ("String", String, true, false),
        ("Structure", Structure, true, false),
        ("Sub", Sub, true, false),
        ("SyncLock", SyncLock, true, false),
        ("Then", Then, true, false),
        ("Throw", Throw, true, false),
        ("To", To, true, false),
        ("True", True, true, false),
        ("Try", Try, true, false),
        ("TryCast", TryCast, true, true),
        ("TypeOf", TypeOf, true, false),
        ("UInteger", UInteger, true, true),
        ("ULong", ULong, true, true),
        ("UShort", UShort, true, true),
        ("Using", Using, true, true),
        ("Wend", Wend, true, false),
        ("When", When, true, false),
        ("While", While, true, false),
        ("Widening", Widening, true, true),
        ("With", With, true, false),
        ("WithEvents", WithEvents, true, false),
        ("WriteOnly", WriteOnly, true, false),
        ("Xor", Xor, true, false),
        ("Ansi", Ansi, false, false),
        ("Assembly", Assembly, false, false),
        ("Auto", Auto, false, false),
        ("Binary", Binary, false, false),
        ("Compare", Compare, false, false),
        ("Custom", Custom, false, true),
        ("Explicit", Explicit, false, false),
        ("ExternalChecksum", ExternalChecksum, false, false),
        ("ExternalSource", ExternalSource, false, false),
        ("IsFalse", IsFalse, false, true),
        ("IsTrue", IsTrue, false, true),
        ("Mid", Mid, false, false),
        ("Off", Off, false, false),
        ("Preserve", Preserve, false, false),
        ("Region", Region, false, false),
        ("Strict", Strict, false, false),
        ("Text", Text, false, false),
        ("Unicode", Unicode, false, false),
        ("Until", Until, false, false),
    ]
};

struct KeywordEntry {
    kind: TokenKind,
    reserved: bool,
    v8: bool,
}

fn keyword_table() -> &'static FxHashMap<String, KeywordEntry> {
    static TABLE: OnceLock<FxHashMap<String, KeywordEntry>> = OnceLock::new();
    TABLE.get_or_init(|| {
        KEYWORDS
            .iter()
            .map(|&(spelling, kind, reserved, v8)| {
                (spelling.to_ascii_lowercase(), KeywordEntry { kind, reserved, v8 })
            })
            .collect()
    })
}

/// A keyword recognized by [`lookup_keyword`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub kind: TokenKind,
    /// Reserved keywords cannot be used as plain identifiers.
    pub reserved: bool,
}

/// Look up an identifier's keyword, case-insensitively and treating
/// full-width letters as ASCII. Keywords introduced after `version` are
/// not recognized.
pub fn lookup_keyword(text: &str, version: LanguageVersion) -> Option<Keyword> {
    if text.len() > 32 {
        return None;
    }
    let mut key = String::with_capacity(text.len());
    for c in text.chars() {
        let c = half_width(c);
        if !c.is_ascii_alphabetic() {
            return None;
        }
        key.push(c.to_ascii_lowercase());
    }
    let entry = keyword_table().get(&key)?;
    if entry.v8 && !version.supports_v8() {
        return None;
    }
    Some(Keyword {
        kind: entry.kind,
        reserved: entry.reserved,
    })
}

impl TokenKind {
    /// The canonical spelling of a keyword or punctuator.
    pub fn as_str(self) -> &'static str {
        use TokenKind::*;
        match self {
            LexicalError => "<error>",
            EndOfStream => "<end of stream>",
            LineTerminator => "<line terminator>",
            Comment => "<comment>",
            Identifier => "<identifier>",
            IntegerLiteral | UnsignedIntegerLiteral => "<integer>",
            FloatingPointLiteral => "<floating point>",
            DecimalLiteral => "<decimal>",
            CharacterLiteral => "<character>",
            StringLiteral => "<string>",
            DateLiteral => "<date>",
            LeftParenthesis => "(",
            RightParenthesis => ")",
            LeftCurlyBrace => "{",
            RightCurlyBrace => "}",
            Exclamation => "!",
            Pound => "#",
            Comma => ",",
            Period => ".",
            Colon => ":",
            ColonEquals => ":=",
            Ampersand => "&",
            AmpersandEquals => "&=",
            Star => "*",
            StarEquals => "*=",
            Plus => "+",
            PlusEquals => "+=",
            Minus => "-",
            MinusEquals => "-=",
            ForwardSlash => "/",
            ForwardSlashEquals => "/=",
            BackwardSlash => "\\",
            BackwardSlashEquals => "\\=",
            Caret => "^",
            CaretEquals => "^=",
            LessThan => "<",
            LessThanEquals => "<=",
            NotEquals => "<>",
            LessThanLessThan => "<<",
            LessThanLessThanEquals => "<<=",
            Equals => "=",
            GreaterThan => ">",
            GreaterThanEquals => ">=",
            GreaterThanGreaterThan => ">>",
            GreaterThanGreaterThanEquals => ">>=",
            QuestionMark => "?",
            keyword => KEYWORDS
                .iter()
                .find(|entry| entry.1 == keyword)
                .map_or("<keyword>", |entry| entry.0),
        }
    }

    /// Whether the kind is a reserved or contextual keyword.
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (TokenKind::AddHandler as u16) && (self as u16) <= (TokenKind::Until as u16)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
