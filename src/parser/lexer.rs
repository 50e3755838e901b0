// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! AQL Lexer (Tokenizer)
//!
//! Lexical problems (unterminated strings, stray characters) never stop the
//! lexer. They come out as [`TokenType::Error`] tokens so the parser can
//! record them and keep going.

use super::token::{
    is_keyword, is_operator, is_operator_char, is_punctuator, Position, Token, TokenType,
};

/// Lexer for tokenizing input
pub struct Lexer {
    /// Input string
    input: Vec<char>,
    /// Current position in input (points to current char)
    position: usize,
    /// Current reading position in input (after current char)
    read_position: usize,
    /// Current character under examination
    ch: char,
    /// Current position tracking
    pos: Position,
    /// Error raised while reading the current token
    last_error: Option<String>,
}

impl Lexer {
    /// Create a new lexer for the given input
    pub fn new(input: &str) -> Self {
        let chars: Vec<char> = input.chars().collect();
        let mut lexer = Self {
            input: chars,
            position: 0,
            read_position: 0,
            ch: '\0',
            pos: Position::new(0, 1, 1),
            last_error: None,
        };
        lexer.read_char();
        lexer
    }

    /// Read the next character
    fn read_char(&mut self) {
        if self.ch == '\n' {
            self.pos.line += 1;
            self.pos.column = 1;
        } else if self.ch != '\0' {
            self.pos.column += 1;
        }

        if self.read_position >= self.input.len() {
            self.ch = '\0';
            self.position = self.input.len();
        } else {
            self.ch = self.input[self.read_position];
            self.position = self.read_position;
        }
        self.read_position += 1;

        self.pos.offset = self.position;
    }

    /// Peek at the next character without advancing
    fn peek_char(&self) -> char {
        if self.read_position >= self.input.len() {
            '\0'
        } else {
            self.input[self.read_position]
        }
    }

    fn at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        self.last_error = None;

        let pos = self.pos;

        if self.at_end() {
            return Token::eof(pos);
        }

        let token = match self.ch {
            // String literal (single quotes), kept with its quotes
            '\'' => {
                let literal = self.read_string_literal();
                Token::new(TokenType::String, literal, pos)
            }

            // Double-quoted identifier
            '"' => {
                let literal = self.read_quoted_identifier('"');
                Token::new(TokenType::Identifier, literal, pos)
            }

            // Number literal (sign is an operator, the parser folds it in)
            c if c.is_ascii_digit() => {
                let literal = self.read_number();
                if literal.contains('.') || literal.contains('e') || literal.contains('E') {
                    Token::new(TokenType::Float, literal, pos)
                } else {
                    Token::new(TokenType::Integer, literal, pos)
                }
            }

            '#' => {
                let literal = self.read_line_comment();
                Token::new(TokenType::Comment, literal, pos)
            }

            '-' if self.peek_char() == '-' => {
                let literal = self.read_line_comment();
                Token::new(TokenType::Comment, literal, pos)
            }

            '/' if self.peek_char() == '*' => {
                let literal = self.read_block_comment();
                Token::new(TokenType::Comment, literal, pos)
            }

            c if is_punctuator(c) => {
                self.read_char();
                Token::new(TokenType::Punctuator, c.to_string(), pos)
            }

            c if is_operator_char(c) => {
                let literal = self.read_operator();
                if !is_operator(&literal) {
                    self.last_error = Some(format!("unrecognized operator: {}", literal));
                }
                Token::new(TokenType::Operator, literal, pos)
            }

            // Identifier or keyword
            c if c.is_alphabetic() || c == '_' => {
                let literal = self.read_identifier();
                if is_keyword(&literal) {
                    Token::new(TokenType::Keyword, literal, pos)
                } else {
                    Token::new(TokenType::Identifier, literal, pos)
                }
            }

            c => {
                self.read_char();
                Token::error(
                    format!("unrecognized character: {:?}", c),
                    c.to_string(),
                    pos,
                )
            }
        };

        match self.last_error.take() {
            Some(message) if !token.is_error() => Token::error(message, token.literal, pos),
            _ => token,
        }
    }

    /// Skip whitespace characters
    fn skip_whitespace(&mut self) {
        while !self.at_end() && self.ch.is_whitespace() {
            self.read_char();
        }
    }

    /// Read an identifier
    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        result.push(self.ch);
        self.read_char();

        while !self.at_end() && (self.ch.is_alphanumeric() || self.ch == '_' || self.ch == '$') {
            result.push(self.ch);
            self.read_char();
        }

        result
    }

    /// Read a number (integer or float)
    fn read_number(&mut self) -> String {
        let mut result = String::new();
        result.push(self.ch);
        self.read_char();

        while self.ch.is_ascii_digit() {
            result.push(self.ch);
            self.read_char();
        }

        if self.ch == '.' && self.peek_char().is_ascii_digit() {
            result.push(self.ch);
            self.read_char();

            while self.ch.is_ascii_digit() {
                result.push(self.ch);
                self.read_char();
            }
        }

        if self.ch == 'e' || self.ch == 'E' {
            result.push(self.ch);
            self.read_char();

            if self.ch == '+' || self.ch == '-' {
                result.push(self.ch);
                self.read_char();
            }

            if !self.ch.is_ascii_digit() {
                self.last_error = Some("invalid number format: exponent has no digits".to_string());
                return result;
            }

            while self.ch.is_ascii_digit() {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }

    /// Read a string literal (single-quoted)
    fn read_string_literal(&mut self) -> String {
        let mut result = String::new();
        let quote = self.ch;
        result.push(quote);
        self.read_char(); // consume opening quote

        loop {
            if self.at_end() {
                self.last_error = Some("unterminated string literal".to_string());
                result.push(quote);
                break;
            } else if self.ch == quote {
                // SQL-style escape: '' becomes '
                if self.peek_char() == quote {
                    result.push(self.ch);
                    self.read_char();
                    self.read_char();
                } else {
                    result.push(quote);
                    self.read_char();
                    break;
                }
            } else {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }

    /// Read a quoted identifier, without its quotes
    fn read_quoted_identifier(&mut self, quote: char) -> String {
        let mut result = String::new();
        self.read_char(); // consume opening quote

        while !self.at_end() {
            if self.ch == quote && self.peek_char() == quote {
                result.push(self.ch);
                self.read_char();
                self.read_char();
            } else if self.ch == quote {
                break;
            } else {
                result.push(self.ch);
                self.read_char();
            }
        }

        if !self.at_end() && self.ch == quote {
            self.read_char();
        } else {
            self.last_error = Some(format!(
                "unterminated quoted identifier starting with {}",
                quote
            ));
        }

        result
    }

    /// Read a single-line comment (-- or #)
    fn read_line_comment(&mut self) -> String {
        let mut result = String::new();

        while !self.at_end() && self.ch != '\n' {
            result.push(self.ch);
            self.read_char();
        }

        result
    }

    /// Read a block comment (/* ... */)
    fn read_block_comment(&mut self) -> String {
        let mut result = String::new();

        result.push(self.ch); // /
        self.read_char();
        result.push(self.ch); // *
        self.read_char();

        while !self.at_end() && !(self.ch == '*' && self.peek_char() == '/') {
            result.push(self.ch);
            self.read_char();
        }

        if !self.at_end() {
            result.push(self.ch); // *
            self.read_char();
            result.push(self.ch); // /
            self.read_char();
        } else {
            self.last_error = Some("unterminated block comment".to_string());
        }

        result
    }

    /// Read an operator, longest match first
    fn read_operator(&mut self) -> String {
        let mut result = String::new();
        let first_char = self.ch;
        result.push(first_char);
        self.read_char();

        if !self.at_end() {
            let two_chars: String = [first_char, self.ch].iter().collect();
            if is_operator(&two_chars) {
                result.push(self.ch);
                self.read_char();
            }
        }

        result
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        if token.is_eof() {
            None
        } else {
            Some(token)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).collect()
    }

    fn types(input: &str) -> Vec<TokenType> {
        tokens(input).into_iter().map(|t| t.token_type).collect()
    }

    #[test]
    fn test_select_statement() {
        let toks = tokens("SELECT foo, bar FROM ns.set");
        let literals: Vec<&str> = toks.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(
            literals,
            vec!["SELECT", "foo", ",", "bar", "FROM", "ns", ".", "set"]
        );
        assert_eq!(toks[0].token_type, TokenType::Keyword);
        assert_eq!(toks[1].token_type, TokenType::Identifier);
        assert_eq!(toks[6].token_type, TokenType::Punctuator);
    }

    #[test]
    fn test_keywords_keep_their_spelling() {
        let toks = tokens("select x from y where a like 'b'");
        assert!(toks[0].is_keyword("SELECT"));
        assert_eq!(toks[0].literal, "select");
        assert!(toks[2].is_keyword("FROM"));
        assert!(toks[4].is_keyword("WHERE"));
        assert!(toks[6].is_keyword("LIKE"));
        assert_eq!(toks[1].token_type, TokenType::Identifier);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            types("10 100.000 1e3"),
            vec![TokenType::Integer, TokenType::Float, TokenType::Float]
        );
        // Sign stays a separate operator token
        let toks = tokens("foo=-10");
        assert_eq!(toks.len(), 4);
        assert!(toks[1].is_operator("="));
        assert!(toks[2].is_operator("-"));
        assert_eq!(toks[3].literal, "10");
    }

    #[test]
    fn test_operators() {
        let toks = tokens("= == != <> < <= > >=");
        let literals: Vec<&str> = toks.iter().map(|t| t.literal.as_str()).collect();
        assert_eq!(literals, vec!["=", "==", "!=", "<>", "<", "<=", ">", ">="]);
        assert!(toks.iter().all(|t| t.token_type == TokenType::Operator));
    }

    #[test]
    fn test_string_literal_keeps_quotes() {
        let toks = tokens("'it''s' '/sparta.*/ie?'");
        assert_eq!(toks[0].literal, "'it's'");
        assert_eq!(toks[1].literal, "'/sparta.*/ie?'");
        assert_eq!(toks[1].token_type, TokenType::String);
    }

    #[test]
    fn test_quoted_identifier() {
        let toks = tokens("\"select\"");
        assert_eq!(toks[0].token_type, TokenType::Identifier);
        assert_eq!(toks[0].literal, "select");
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            types("a -- trailing\n# hash\n/* block */ b"),
            vec![
                TokenType::Identifier,
                TokenType::Comment,
                TokenType::Comment,
                TokenType::Comment,
                TokenType::Identifier
            ]
        );
    }

    #[test]
    fn test_errors_do_not_stop_lexing() {
        let toks = tokens("a ~ b ! 'open");
        assert_eq!(toks[0].literal, "a");
        assert!(toks[1].is_error());
        assert_eq!(toks[2].literal, "b");
        assert!(toks[3].is_error());
        assert!(toks[4].is_error());
        assert_eq!(
            toks[4].error.as_deref(),
            Some("unterminated string literal")
        );
    }

    #[test]
    fn test_positions() {
        let toks = tokens("SELECT\n  foo");
        assert_eq!(toks[0].position, Position::new(0, 1, 1));
        assert_eq!(toks[1].position.line, 2);
        assert_eq!(toks[1].position.column, 3);
    }
}
