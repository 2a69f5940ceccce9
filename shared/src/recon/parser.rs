use std::collections::VecDeque;

use log::{debug, trace};

use super::{
    classifiers::is_space,
    cursor::InputCursor,
    error::{ReconError, ReconErrorKind},
    event::ReadEvent,
    parser_config::ParserConfig,
    tokens::{Step, TokenLexer},
    transition::{transition, NestingContext, StateChange},
};

/// Outcome of [`ReconParser::feed`].
#[derive(Debug, Clone, PartialEq)]
pub enum FeedResult {
    /// The value is not complete yet; feed the next chunk
    NeedsMoreInput,
    /// The value is complete. Carries every event not already pulled with
    /// [`ReconParser::next_event`]
    Done(Vec<ReadEvent>),
    /// Terminal failure; the parser must be discarded
    Error(ReconError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Parsing,
    /// The value is complete but the stream has not ended: only whitespace
    /// may follow
    Complete,
    /// The final chunk was seen
    Finished,
    Failed,
}

/// Incremental parser for a single Recon value.
///
/// Input arrives in chunks through [`ReconParser::feed`]. Nesting is tracked
/// on an explicit stack of [`NestingContext`]s rather than by recursion, so
/// a parse can stop at any chunk boundary and resume by dispatching on the
/// context on top of the stack. A token cut by a chunk boundary is kept as a
/// [`TokenLexer`] and continues from where it stopped.
///
/// Once the value is complete the rest of the stream may only hold
/// whitespace; anything else fails the parse.
pub struct ReconParser {
    config: ParserConfig,
    stack: Vec<NestingContext>,
    events: VecDeque<ReadEvent>,
    token: Option<TokenLexer>,
    // stream offset of the start of the next chunk
    consumed: usize,
    state: ParserState,
}

impl ReconParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            stack: vec![NestingContext::Init],
            events: VecDeque::new(),
            token: None,
            consumed: 0,
            state: ParserState::Parsing,
        }
    }

    /// Feed the next chunk of text. `is_partial` is false only for the last
    /// chunk; an empty final chunk forces any pending token to resolve.
    ///
    /// `Done` is returned as soon as the value is complete. If that happens
    /// on a partial chunk, later chunks are still accepted and checked for
    /// trailing input, each answering `Done` with no further events.
    pub fn feed(&mut self, chunk: &str, is_partial: bool) -> FeedResult {
        let mut cursor = InputCursor::with_base(chunk, self.consumed, is_partial);
        match self.state {
            ParserState::Parsing => {}
            ParserState::Complete => return self.trailing(&mut cursor),
            ParserState::Finished | ParserState::Failed => {
                return FeedResult::Error(ReconError::new(
                    ReconErrorKind::ParserFinished,
                    self.consumed,
                ));
            }
        }

        loop {
            let Some(&top) = self.stack.last() else {
                self.state = ParserState::Complete;
                return self.trailing(&mut cursor);
            };

            match transition(top, &mut self.token, &mut cursor) {
                Ok(Step::Ready(next)) => {
                    trace!("{:?} -> {:?}", top, next.change);
                    next.events.push_into(&mut self.events);
                    if let Err(error) = self.apply(next.change, cursor.position()) {
                        return self.fail(error);
                    }
                }
                Ok(Step::Pending) => {
                    self.consumed += chunk.len();
                    return FeedResult::NeedsMoreInput;
                }
                Err(error) => return self.fail(error),
            }
        }
    }

    /// Input after the complete value.
    fn trailing(&mut self, cursor: &mut InputCursor) -> FeedResult {
        cursor.skip_while(is_space);
        if let Some(c) = cursor.peek() {
            let error = ReconError::new(
                ReconErrorKind::UnexpectedCharacter { found: c },
                cursor.position(),
            );
            return self.fail(error);
        }
        self.consumed = cursor.position();
        if !cursor.is_partial() {
            self.state = ParserState::Finished;
        }
        FeedResult::Done(self.events.drain(..).collect())
    }

    /// Pull the oldest event produced so far, if any.
    pub fn next_event(&mut self) -> Option<ReadEvent> {
        self.events.pop_front()
    }

    /// Whether the value is complete. Trailing whitespace may still follow.
    pub fn is_done(&self) -> bool {
        matches!(self.state, ParserState::Complete | ParserState::Finished)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn fail(&mut self, error: ReconError) -> FeedResult {
        debug!("Recon parse failed: {}", error);
        self.state = ParserState::Failed;
        self.stack.clear();
        self.events.clear();
        self.token = None;
        FeedResult::Error(error)
    }

    fn apply(&mut self, change: StateChange, offset: usize) -> Result<(), ReconError> {
        match change {
            StateChange::Clear => self.stack.clear(),
            StateChange::ReplaceTop(context) => self.replace_top(context),
            StateChange::PopAfterItem => {
                self.stack.pop();
                if let Some(top) = self.stack.last_mut() {
                    *top = top.after_item();
                }
            }
            StateChange::PushAttrBody => {
                self.replace_top(NestingContext::AfterAttr);
                self.push(NestingContext::AttrBodyStartOrNl, offset)?;
            }
            StateChange::PushAttrNewRec { has_body } => {
                self.advance_top();
                self.push(NestingContext::AfterAttr, offset)?;
                if has_body {
                    self.push(NestingContext::AttrBodyStartOrNl, offset)?;
                }
            }
            StateChange::PushBody => {
                self.advance_top();
                self.push(NestingContext::RecordBodyStartOrNl, offset)?;
            }
        }
        Ok(())
    }

    fn replace_top(&mut self, context: NestingContext) {
        match self.stack.last_mut() {
            Some(top) => *top = context,
            None => self.stack.push(context),
        }
    }

    fn advance_top(&mut self) {
        if let Some(top) = self.stack.last_mut() {
            *top = top.after_item();
        }
    }

    fn push(&mut self, context: NestingContext, offset: usize) -> Result<(), ReconError> {
        if self.stack.len() >= self.config.max_depth {
            return Err(ReconError::new(
                ReconErrorKind::NestingTooDeep {
                    limit: self.config.max_depth,
                },
                offset,
            ));
        }
        self.stack.push(context);
        Ok(())
    }
}

impl Default for ReconParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one complete Recon value.
pub fn parse_events(text: &str) -> Result<Vec<ReadEvent>, ReconError> {
    let mut parser = ReconParser::new();
    match parser.feed(text, false) {
        FeedResult::Done(events) => Ok(events),
        FeedResult::Error(error) => Err(error),
        // a non-partial feed always resolves
        FeedResult::NeedsMoreInput => Err(ReconError::new(
            ReconErrorKind::UnexpectedEnd,
            text.len(),
        )),
    }
}
