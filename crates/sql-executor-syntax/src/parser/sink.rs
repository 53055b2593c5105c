//! Sink for converting parser events into a Rowan green tree.
//!
//! Trivia (whitespace, newlines, comments) never reaches the parser, so the
//! sink re-inserts it. Trivia in front of a node's first token is attached
//! to the parent before the node starts, and trivia left at the very end
//! goes to the root. Every node therefore starts at its first significant
//! token and ends at its last one, which is exactly a statement's span.

use rowan::GreenNodeBuilder;

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::{SyntaxKind, SyntaxNode};

/// Converts parser events and tokens into a Rowan syntax tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    depth: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            depth: 0,
            events,
        }
    }

    /// Consume the sink and build the syntax tree.
    pub fn finish(mut self) -> SyntaxNode {
        for event in std::mem::take(&mut self.events) {
            match event {
                Event::Start { kind } => {
                    // The root has nothing to hold leading trivia yet.
                    if self.depth > 0 {
                        self.eat_trivia();
                    }
                    self.builder.start_node(kind.into());
                    self.depth += 1;
                }
                Event::Token { kind } => {
                    self.eat_trivia();
                    self.token(kind);
                }
                Event::Finish => {
                    if self.depth == 1 {
                        self.eat_trivia();
                    }
                    self.builder.finish_node();
                    self.depth -= 1;
                }
                Event::Placeholder => {}
            }
        }

        SyntaxNode::new_root(self.builder.finish())
    }

    fn token(&mut self, kind: SyntaxKind) {
        let text = self.tokens[self.cursor].text;
        self.builder.token(kind.into(), text);
        self.cursor += 1;
    }

    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.cursor += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use pretty_assertions::assert_eq;

    #[test]
    fn sink_builds_simple_tree() {
        let tokens = lex("PRINT 1");
        let events = vec![
            Event::start(SyntaxKind::SCRIPT),
            Event::start(SyntaxKind::STATEMENT),
            Event::token(SyntaxKind::WORD),
            Event::token(SyntaxKind::NUMBER),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&tokens, events).finish();

        assert_eq!(tree.kind(), SyntaxKind::SCRIPT);
        assert_eq!(tree.children().count(), 1);
        assert_eq!(tree.text().to_string(), "PRINT 1");
    }

    #[test]
    fn trivia_stays_outside_nodes() {
        let input = "  -- lead\n  PRINT 1 ; -- trail\n";
        let tokens = lex(input);
        let events = vec![
            Event::start(SyntaxKind::SCRIPT),
            Event::start(SyntaxKind::STATEMENT),
            Event::token(SyntaxKind::WORD),
            Event::token(SyntaxKind::NUMBER),
            Event::token(SyntaxKind::SEMICOLON),
            Event::Finish,
            Event::Finish,
        ];

        let tree = Sink::new(&tokens, events).finish();
        let statement = tree.first_child().unwrap();

        assert_eq!(tree.text().to_string(), input);
        assert_eq!(statement.text().to_string(), "PRINT 1 ;");
        assert_eq!(u32::from(statement.text_range().start()), 12);
    }

    #[test]
    fn abandoned_placeholder_is_ignored() {
        let tokens = lex("x");
        let events = vec![
            Event::start(SyntaxKind::SCRIPT),
            Event::Placeholder,
            Event::token(SyntaxKind::WORD),
            Event::Finish,
        ];

        let tree = Sink::new(&tokens, events).finish();
        assert_eq!(tree.children().count(), 0);
        assert_eq!(tree.text().to_string(), "x");
    }
}
