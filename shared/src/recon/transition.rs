//! The parse-state transition table.
//!
//! [`transition`] looks only at the context on top of the nesting stack, the
//! token in progress (if a chunk boundary cut one) and the input under the
//! cursor. It returns the events recognised in one step and a
//! [`StateChange`] for the driver to apply to the stack; it never sees or
//! touches the stack itself.

use super::{
    classifiers::{is_inline_space, is_item_separator, is_newline, is_space},
    cursor::InputCursor,
    error::{ReconError, ReconErrorKind},
    event::ReadEvent,
    tokens::{ready, AttrFollower, Step, Token, TokenLexer},
};

/// Parser positions. The stack holds one of these per open attribute or
/// record body, so its depth is the current nesting depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NestingContext {
    /// Before the top-level value
    Init,
    /// After a record's attribute, before its body
    AfterAttr,
    RecordBodyStartOrNl,
    AttrBodyStartOrNl,
    RecordBodyAfterSep,
    AttrBodyAfterSep,
    RecordBodyAfterValue,
    AttrBodyAfterValue,
    RecordBodySlot,
    AttrBodySlot,
    RecordBodyAfterSlot,
    AttrBodyAfterSlot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Record,
    Attr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyPosition {
    StartOrNl,
    AfterSep,
    AfterValue,
    Slot,
    AfterSlot,
}

impl BodyKind {
    fn closer(self) -> char {
        match self {
            BodyKind::Record => '}',
            BodyKind::Attr => ')',
        }
    }

    fn foreign_closer(self) -> char {
        match self {
            BodyKind::Record => ')',
            BodyKind::Attr => '}',
        }
    }

    fn end_event(self) -> ReadEvent {
        match self {
            BodyKind::Record => ReadEvent::EndRecord,
            BodyKind::Attr => ReadEvent::EndAttribute,
        }
    }

    fn unclosed(self) -> ReconErrorKind {
        match self {
            BodyKind::Record => ReconErrorKind::UnclosedRecord,
            BodyKind::Attr => ReconErrorKind::UnclosedAttribute,
        }
    }
}

impl NestingContext {
    fn body(self) -> Option<(BodyKind, BodyPosition)> {
        use BodyKind::*;
        use BodyPosition::*;
        use NestingContext::*;

        match self {
            Init | AfterAttr => None,
            RecordBodyStartOrNl => Some((Record, StartOrNl)),
            AttrBodyStartOrNl => Some((Attr, StartOrNl)),
            RecordBodyAfterSep => Some((Record, AfterSep)),
            AttrBodyAfterSep => Some((Attr, AfterSep)),
            RecordBodyAfterValue => Some((Record, AfterValue)),
            AttrBodyAfterValue => Some((Attr, AfterValue)),
            RecordBodySlot => Some((Record, Slot)),
            AttrBodySlot => Some((Attr, Slot)),
            RecordBodyAfterSlot => Some((Record, AfterSlot)),
            AttrBodyAfterSlot => Some((Attr, AfterSlot)),
        }
    }

    fn from_body(kind: BodyKind, position: BodyPosition) -> Self {
        use BodyKind::*;
        use BodyPosition::*;
        use NestingContext::*;

        match (kind, position) {
            (Record, StartOrNl) => RecordBodyStartOrNl,
            (Attr, StartOrNl) => AttrBodyStartOrNl,
            (Record, AfterSep) => RecordBodyAfterSep,
            (Attr, AfterSep) => AttrBodyAfterSep,
            (Record, AfterValue) => RecordBodyAfterValue,
            (Attr, AfterValue) => AttrBodyAfterValue,
            (Record, Slot) => RecordBodySlot,
            (Attr, Slot) => AttrBodySlot,
            (Record, AfterSlot) => RecordBodyAfterSlot,
            (Attr, AfterSlot) => AttrBodyAfterSlot,
        }
    }

    /// The context once the item that started here has been read completely.
    pub fn after_item(self) -> Self {
        match self.body() {
            None => self,
            Some((kind, BodyPosition::Slot | BodyPosition::AfterSlot)) => {
                Self::from_body(kind, BodyPosition::AfterSlot)
            }
            Some((kind, _)) => Self::from_body(kind, BodyPosition::AfterValue),
        }
    }
}

/// Instruction to the driver for the nesting stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    /// The top-level value is complete
    Clear,
    ReplaceTop(NestingContext),
    /// A body closed: pop it and move the enclosing context past its item
    PopAfterItem,
    /// `@name(` before a record body: the top becomes `AfterAttr` and the
    /// attribute's body is pushed
    PushAttrBody,
    /// `@name` where an item was expected: the enclosing context moves past the
    /// item and a new record is opened at `AfterAttr`
    PushAttrNewRec { has_body: bool },
    /// `{` where an item was expected
    PushBody,
}

/// Zero, one or two events produced by a single step.
#[derive(Debug, Clone, PartialEq)]
pub enum Emission {
    Nothing,
    One(ReadEvent),
    Two(ReadEvent, ReadEvent),
}

impl Emission {
    pub fn push_into(self, out: &mut impl Extend<ReadEvent>) {
        match self {
            Emission::Nothing => {}
            Emission::One(event) => out.extend([event]),
            Emission::Two(first, second) => out.extend([first, second]),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub events: Emission,
    pub change: StateChange,
}

impl Transition {
    fn new(events: Emission, change: StateChange) -> Step<Self> {
        Step::Ready(Self { events, change })
    }
}

fn unexpected(c: char, cursor: &InputCursor) -> ReconError {
    ReconError::new(ReconErrorKind::UnexpectedCharacter { found: c }, cursor.position())
}

/// One step of the table for the context on top of the stack. `token` holds
/// a token cut short by the end of the previous chunk; it is resumed before
/// anything else and cleared once complete.
pub fn transition(
    context: NestingContext,
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    if let Some(lexer) = token.take() {
        return lex(context, lexer, token, cursor);
    }
    match context {
        NestingContext::Init => init(token, cursor),
        NestingContext::AfterAttr => after_attr(token, cursor),
        _ => match context.body() {
            Some((kind, position)) => body(context, kind, position, token, cursor),
            None => Err(ReconError::new(ReconErrorKind::UnexpectedEnd, cursor.position())),
        },
    }
}

/// Run `lexer` over the cursor, parking it in `token` if the chunk runs out.
fn lex(
    context: NestingContext,
    lexer: TokenLexer,
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    let lexer = token.insert(lexer);
    let complete = ready!(lexer.resume(cursor)?);
    *token = None;
    Ok(Step::Ready(on_token(context, complete)))
}

fn on_token(context: NestingContext, token: Token) -> Transition {
    let in_body = context.body().is_some();
    let (events, change) = match token {
        Token::Literal(event) if in_body => (
            Emission::One(event),
            StateChange::ReplaceTop(context.after_item()),
        ),
        Token::Literal(event) => (Emission::One(event), StateChange::Clear),
        Token::Attribute { name, follower } => {
            let start = ReadEvent::StartAttribute(name);
            match (follower, in_body) {
                (AttrFollower::Body, false) => (Emission::One(start), StateChange::PushAttrBody),
                (AttrFollower::Bare, false) => (
                    Emission::Two(start, ReadEvent::EndAttribute),
                    StateChange::ReplaceTop(NestingContext::AfterAttr),
                ),
                (AttrFollower::Body, true) => (
                    Emission::One(start),
                    StateChange::PushAttrNewRec { has_body: true },
                ),
                (AttrFollower::Bare, true) => (
                    Emission::Two(start, ReadEvent::EndAttribute),
                    StateChange::PushAttrNewRec { has_body: false },
                ),
            }
        }
    };
    Transition { events, change }
}

fn init(
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    let context = NestingContext::Init;
    cursor.skip_while(is_space);
    match cursor.peek() {
        None if cursor.is_partial() => Ok(Step::Pending),
        None => Ok(Transition::new(
            Emission::One(ReadEvent::Extant),
            StateChange::Clear,
        )),
        Some('@') => lex(context, TokenLexer::attribute(cursor), token, cursor),
        Some('{') => {
            cursor.advance('{');
            Ok(Transition::new(
                Emission::One(ReadEvent::StartBody),
                StateChange::ReplaceTop(NestingContext::RecordBodyStartOrNl),
            ))
        }
        Some(c) => lex(context, TokenLexer::literal(c, cursor)?, token, cursor),
    }
}

fn after_attr(
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    cursor.skip_while(is_inline_space);
    let empty_body = || {
        Transition::new(
            Emission::Two(ReadEvent::StartBody, ReadEvent::EndRecord),
            StateChange::PopAfterItem,
        )
    };
    match cursor.peek() {
        None if cursor.is_partial() => Ok(Step::Pending),
        None => Ok(empty_body()),
        Some('@') => lex(NestingContext::AfterAttr, TokenLexer::attribute(cursor), token, cursor),
        Some('{') => {
            cursor.advance('{');
            Ok(Transition::new(
                Emission::One(ReadEvent::StartBody),
                StateChange::ReplaceTop(NestingContext::RecordBodyStartOrNl),
            ))
        }
        // anything else belongs to the enclosing context
        Some(_) => Ok(empty_body()),
    }
}

fn body(
    context: NestingContext,
    kind: BodyKind,
    position: BodyPosition,
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    let replace = |position| StateChange::ReplaceTop(NestingContext::from_body(kind, position));

    match position {
        BodyPosition::StartOrNl | BodyPosition::AfterSep => cursor.skip_while(is_space),
        _ => cursor.skip_while(is_inline_space),
    }
    let Some(c) = cursor.peek() else {
        return if cursor.is_partial() {
            Ok(Step::Pending)
        } else {
            Err(ReconError::new(kind.unclosed(), cursor.position()))
        };
    };

    if c == kind.closer() && position != BodyPosition::Slot {
        cursor.advance(c);
        return Ok(Transition::new(
            Emission::One(kind.end_event()),
            StateChange::PopAfterItem,
        ));
    }
    if c == kind.foreign_closer() {
        return Err(unexpected(c, cursor));
    }

    match position {
        BodyPosition::StartOrNl | BodyPosition::AfterSep => {
            if is_item_separator(c) {
                cursor.advance(c);
                Ok(Transition::new(
                    Emission::One(ReadEvent::Extant),
                    replace(BodyPosition::AfterSep),
                ))
            } else if c == ':' {
                cursor.advance(c);
                Ok(Transition::new(
                    Emission::Two(ReadEvent::Extant, ReadEvent::Slot),
                    replace(BodyPosition::Slot),
                ))
            } else {
                item(context, c, token, cursor)
            }
        }
        BodyPosition::AfterValue => {
            if is_item_separator(c) {
                cursor.advance(c);
                Ok(Transition::new(Emission::Nothing, replace(BodyPosition::AfterSep)))
            } else if is_newline(c) {
                cursor.advance(c);
                Ok(Transition::new(Emission::Nothing, replace(BodyPosition::StartOrNl)))
            } else if c == ':' {
                cursor.advance(c);
                Ok(Transition::new(
                    Emission::One(ReadEvent::Slot),
                    replace(BodyPosition::Slot),
                ))
            } else {
                Err(unexpected(c, cursor))
            }
        }
        BodyPosition::Slot => {
            if c == kind.closer() || is_item_separator(c) || is_newline(c) {
                Ok(Transition::new(
                    Emission::One(ReadEvent::Extant),
                    replace(BodyPosition::AfterSlot),
                ))
            } else if c == ':' {
                Err(unexpected(c, cursor))
            } else {
                item(context, c, token, cursor)
            }
        }
        BodyPosition::AfterSlot => {
            if is_item_separator(c) {
                cursor.advance(c);
                Ok(Transition::new(Emission::Nothing, replace(BodyPosition::AfterSep)))
            } else if is_newline(c) {
                cursor.advance(c);
                Ok(Transition::new(Emission::Nothing, replace(BodyPosition::StartOrNl)))
            } else {
                Err(unexpected(c, cursor))
            }
        }
    }
}

/// A value where a body expects an item or a slot value.
fn item(
    context: NestingContext,
    first: char,
    token: &mut Option<TokenLexer>,
    cursor: &mut InputCursor,
) -> Result<Step<Transition>, ReconError> {
    match first {
        '@' => lex(context, TokenLexer::attribute(cursor), token, cursor),
        '{' => {
            cursor.advance('{');
            Ok(Transition::new(
                Emission::One(ReadEvent::StartBody),
                StateChange::PushBody,
            ))
        }
        _ => lex(context, TokenLexer::literal(first, cursor)?, token, cursor),
    }
}
