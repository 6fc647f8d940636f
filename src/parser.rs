/*!
Recursive-descent parser for Quill.

Grammar (condensed EBNF)
------------------------

```text
program        → ( statement ";" )* EOF ;
statement      → varDecl | functionDecl | ifStmt | forStmt | whileStmt
               | assignment ;
varDecl        → ( "let" | "const" | TYPE ) IDENT ( "=" assignment )? ;
functionDecl   → "function" IDENT "(" parameters? ")" block ;
ifStmt         → "if" "(" assignment ")" block ( ";" "else" ( ifStmt | block ) )? ;
forStmt        → "for" "(" varDecl ";" assignment ";" assignment ")" block ;
whileStmt      → "while" "(" assignment ")" block ;
block          → "{" ( statement ";" )* "}" ;
assignment     → logical ( "=" assignment )? ;
logical        → relational ( ( "&&" | "||" ) relational )* ;
relational     → equality ( ( "<" | ">" | "<=" | ">=" ) equality )? ;
equality       → object ( ( "==" | "!=" ) object )? ;
object         → "{" ( property ( "," property )* )? "}" | additive ;
additive       → multiplicative ( ( "+" | "-" ) multiplicative )* ;
multiplicative → exponent ( ( "*" | "/" | "%" | "//" ) exponent )* ;
exponent       → unary ( "^" unary )* ;
unary          → ( "+" | "-" ) primary | callMember ;
callMember     → member ( "(" arguments? ")" )* ;
member         → strOrArr ( "." primary | "[" assignment "]" )* ;
strOrArr       → '"' TEXT? '"' | "[" elements? "]" | primary ;
primary        → IDENT | NUMBER | "null" | BOOL | "unassigned"
               | "(" assignment ")" | "break" | "continue"
               | "return" assignment ;
```

Relational and equality operators are deliberately non-associative: a single
optional operator, not a chain.

`break`/`continue`/`return` are legal only inside a loop / function body;
this is enforced at parse time via the `in_function` / `in_loop` flags
threaded through every production.  Argument lists and parenthesised
sub-expressions reset the flags.
*/

use crate::ast::{Expr, Program, Property, Stmt, TypeAnnotation};
use crate::error::{QuillError, Result};
use crate::lexer::tokenize;
use crate::token::{Token, TokenType};

use log::{debug, info};

/// Top-level parser: a token buffer plus a cursor index.
pub struct Parser {
    tokens: Vec<Token>,
    idx: usize,
}

impl Parser {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            idx: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Tokenize `source` and parse the whole program.  Every top-level
    /// statement must be terminated by a semicolon.
    pub fn produce_ast(&mut self, source: &str) -> Result<Program> {
        self.tokens = tokenize(source)?;
        self.idx = 0;

        info!("Parser starting over {} tokens", self.tokens.len());

        let mut body: Vec<Stmt> = Vec::new();

        while self.at().token_type != TokenType::Eof {
            body.push(self.parse_statement(false, false)?);
            self.expect(TokenType::Semicolon, "Missing ;")?;
        }

        Ok(Program { body })
    }

    // ────────────────────── cursor helpers ────────────────────────

    /// Peek at the current token without consuming it.
    #[inline(always)]
    fn at(&self) -> &Token {
        &self.tokens[self.idx]
    }

    /// Consume and return the current token.
    #[inline(always)]
    fn eat(&mut self) -> Token {
        let token = self.tokens[self.idx].clone();
        self.idx += 1;
        token
    }

    /// Consume the current token, failing with `message` (and the token's
    /// line) when its kind is not `expected`.
    fn expect(&mut self, expected: TokenType, message: &str) -> Result<Token> {
        let prev = self.eat();

        if prev.token_type != expected {
            debug!(
                "expect failed: wanted {:?}, found {:?} ('{}')",
                expected, prev.token_type, prev.lexeme
            );

            return Err(QuillError::parse(prev.line, message));
        }

        Ok(prev)
    }

    // ──────────────────────── statements ──────────────────────────

    fn parse_statement(&mut self, in_function: bool, in_loop: bool) -> Result<Stmt> {
        debug!("parse_statement at {:?}", self.at().token_type);

        match self.at().token_type {
            TokenType::Let
            | TokenType::Const
            | TokenType::Int
            | TokenType::Float
            | TokenType::Str
            | TokenType::Bool
            | TokenType::Obj
            | TokenType::Any => self.parse_var_declaration(in_function, in_loop),

            TokenType::Function => self.parse_function_declaration(in_function, in_loop),

            TokenType::If => self.parse_if_statement(in_function, in_loop),

            TokenType::For => self.parse_for_statement(in_function),

            TokenType::While => self.parse_while_statement(in_function),

            _ => Ok(Stmt::Expr(
                self.parse_assignment_expr(in_function, in_loop)?,
            )),
        }
    }

    fn parse_var_declaration(&mut self, in_function: bool, in_loop: bool) -> Result<Stmt> {
        let intro = self.eat();
        let constant = intro.token_type == TokenType::Const;

        let annotation = match intro.token_type {
            TokenType::Int => Some(TypeAnnotation::Int),
            TokenType::Float => Some(TypeAnnotation::Float),
            TokenType::Str => Some(TypeAnnotation::Str),
            TokenType::Bool => Some(TypeAnnotation::Bool),
            TokenType::Obj => Some(TypeAnnotation::Obj),
            TokenType::Any => Some(TypeAnnotation::Any),
            _ => None,
        };

        let identifier = self
            .expect(
                TokenType::Identifier,
                "Expected identifier name following declaration keyword",
            )?
            .lexeme;

        // `let x;` declares unassigned; a constant must carry a value.
        if self.at().token_type == TokenType::Semicolon {
            if constant {
                return Err(QuillError::parse(
                    self.at().line,
                    "Must assign value to constant expression",
                ));
            }

            return Ok(Stmt::VarDeclaration {
                constant: false,
                annotation,
                identifier,
                value: None,
            });
        }

        self.expect(
            TokenType::Equals,
            "Expected equals token following identifier in var declaration",
        )?;

        let value = self.parse_assignment_expr(in_function, in_loop)?;

        Ok(Stmt::VarDeclaration {
            constant,
            annotation,
            identifier,
            value: Some(value),
        })
    }

    fn parse_function_declaration(&mut self, in_function: bool, in_loop: bool) -> Result<Stmt> {
        // Falls through to an expression when not actually at `function`;
        // object-literal property values re-enter the parser here.
        if self.at().token_type != TokenType::Function {
            return Ok(Stmt::Expr(
                self.parse_assignment_expr(in_function, in_loop)?,
            ));
        }

        self.eat();

        let name = self
            .expect(
                TokenType::Identifier,
                "Expected function name after function keyword",
            )?
            .lexeme;

        let args = self.parse_args()?;
        let mut parameters: Vec<String> = Vec::with_capacity(args.len());

        for arg in args {
            let Expr::Identifier(symbol) = arg else {
                return Err(QuillError::parse(
                    self.at().line,
                    format!(
                        "Expected function parameters to be identifiers in declaration of '{name}'"
                    ),
                ));
            };

            parameters.push(symbol);
        }

        let body = self.parse_block_statement(true, in_loop)?;

        Ok(Stmt::FunctionDeclaration {
            name,
            parameters,
            body,
        })
    }

    fn parse_if_statement(&mut self, in_function: bool, in_loop: bool) -> Result<Stmt> {
        self.eat();

        self.expect(TokenType::OpenParen, "Expected ( after keyword if")?;
        let condition = self.parse_assignment_expr(in_function, in_loop)?;
        self.expect(TokenType::CloseParen, "Expected )")?;

        let body = self.parse_block_statement(in_function, in_loop)?;

        // The `;` that closes the if-block is consumed here when an `else`
        // follows, so the chain reads `if {...}; else {...}`.
        if self
            .tokens
            .get(self.idx + 1)
            .map(|t| t.token_type == TokenType::Else)
            .unwrap_or(false)
        {
            self.expect(TokenType::Semicolon, "Expected ;")?;
        }

        let mut else_body: Vec<Stmt> = Vec::new();

        if self.at().token_type == TokenType::Else {
            self.eat();

            if self.at().token_type == TokenType::If {
                // `else if` chains right-recursively.
                else_body = vec![self.parse_if_statement(in_function, in_loop)?];
            } else {
                else_body = self.parse_block_statement(in_function, in_loop)?;
            }
        }

        Ok(Stmt::If {
            condition,
            body,
            else_body,
        })
    }

    fn parse_for_statement(&mut self, in_function: bool) -> Result<Stmt> {
        // No elided clauses: `for (;;)` is rejected by the productions below.
        self.eat();

        self.expect(TokenType::OpenParen, "Expected (")?;
        let init = self.parse_var_declaration(in_function, false)?;
        self.expect(TokenType::Semicolon, "Expected ;")?;
        let condition = self.parse_assignment_expr(in_function, false)?;
        self.expect(TokenType::Semicolon, "Expected ;")?;
        let iteration = self.parse_assignment_expr(in_function, false)?;
        self.expect(TokenType::CloseParen, "Expected )")?;

        let body = self.parse_block_statement(in_function, true)?;

        Ok(Stmt::For {
            init: Box::new(init),
            condition,
            iteration,
            body,
        })
    }

    fn parse_while_statement(&mut self, in_function: bool) -> Result<Stmt> {
        self.eat();

        self.expect(TokenType::OpenParen, "Expected (")?;
        let condition = self.parse_assignment_expr(in_function, false)?;
        self.expect(TokenType::CloseParen, "Expected )")?;

        let body = self.parse_block_statement(in_function, true)?;

        Ok(Stmt::While { condition, body })
    }

    /// `{ stmt; stmt; ... }`; every inner statement requires a terminating
    /// semicolon.
    fn parse_block_statement(&mut self, in_function: bool, in_loop: bool) -> Result<Vec<Stmt>> {
        self.expect(TokenType::OpenBrace, "{ expected")?;

        let mut body: Vec<Stmt> = Vec::new();

        while self.at().token_type != TokenType::Eof
            && self.at().token_type != TokenType::CloseBrace
        {
            body.push(self.parse_statement(in_function, in_loop)?);
            self.expect(TokenType::Semicolon, "; expected")?;
        }

        self.expect(TokenType::CloseBrace, "} expected")?;

        Ok(body)
    }

    // ──────────────────────── expressions ─────────────────────────

    fn parse_assignment_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let left = self.parse_logical_expr(in_function, in_loop)?;

        if self.at().token_type == TokenType::Equals {
            self.eat();

            let value = self.parse_assignment_expr(in_function, in_loop)?;

            return Ok(Expr::Assignment {
                assignee: Box::new(left),
                value: Box::new(value),
            });
        }

        Ok(left)
    }

    fn parse_logical_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let mut left = self.parse_relational_expr(in_function, in_loop)?;

        while self.at().lexeme == "&&" || self.at().lexeme == "||" {
            let operator = self.eat().lexeme;
            let right = self.parse_relational_expr(in_function, in_loop)?;

            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_relational_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let left = self.parse_equality_expr(in_function, in_loop)?;

        if matches!(
            self.at().token_type,
            TokenType::LessThan
                | TokenType::GreaterThan
                | TokenType::LessOrEqual
                | TokenType::GreaterOrEqual
        ) {
            let operator = self.eat().lexeme;
            let right = self.parse_equality_expr(in_function, in_loop)?;

            return Ok(Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_equality_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let left = self.parse_object_expr(in_function, in_loop)?;

        if matches!(
            self.at().token_type,
            TokenType::Equality | TokenType::Inequality
        ) {
            let operator = self.eat().lexeme;
            let right = self.parse_object_expr(in_function, in_loop)?;

            return Ok(Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    /// Object literals sit between equality and additive in the precedence
    /// ladder; a `{` in expression position always opens one (blocks never
    /// occur in expression position).
    fn parse_object_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        if self.at().token_type != TokenType::OpenBrace {
            return self.parse_additive_expr(in_function, in_loop);
        }

        self.eat();

        let mut properties: Vec<Property> = Vec::new();

        while self.at().token_type != TokenType::Eof
            && self.at().token_type != TokenType::CloseBrace
        {
            let key = match self.at().token_type {
                TokenType::Identifier => {
                    self.expect(TokenType::Identifier, "Invalid key for object")?
                        .lexeme
                }

                TokenType::QuotationMark => {
                    let literal = self.parse_str_or_arr_literal(in_function, in_loop)?;

                    let Expr::StringLiteral(text) = literal else {
                        return Err(QuillError::parse(self.at().line, "Invalid key for object"));
                    };

                    text
                }

                _ => {
                    return Err(QuillError::parse(self.at().line, "Invalid key for object"));
                }
            };

            // Shorthand `{key, ...}` / `{key}`: value resolved at runtime.
            if self.at().token_type == TokenType::Comma {
                self.eat();
                properties.push(Property { key, value: None });
                continue;
            } else if self.at().token_type == TokenType::CloseBrace {
                properties.push(Property { key, value: None });
                continue;
            }

            self.expect(TokenType::Colon, "Expected :")?;

            let value = self.parse_function_declaration(in_function, in_loop)?;
            properties.push(Property {
                key,
                value: Some(Box::new(value)),
            });

            if self.at().token_type != TokenType::CloseBrace {
                self.expect(TokenType::Comma, "Expected , or } following property")?;
            }
        }

        self.expect(TokenType::CloseBrace, "Expected }")?;

        Ok(Expr::ObjectLiteral(properties))
    }

    fn parse_additive_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let mut left = self.parse_multiplicative_expr(in_function, in_loop)?;

        while self.at().lexeme == "+" || self.at().lexeme == "-" {
            let operator = self.eat().lexeme;
            let right = self.parse_multiplicative_expr(in_function, in_loop)?;

            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let mut left = self.parse_exponent_expr(in_function, in_loop)?;

        while self.at().lexeme == "*"
            || self.at().lexeme == "/"
            || self.at().lexeme == "%"
            || self.at().lexeme == "//"
        {
            let operator = self.eat().lexeme;
            let right = self.parse_exponent_expr(in_function, in_loop)?;

            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_exponent_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let mut left = self.parse_unary_expr(in_function, in_loop)?;

        while self.at().lexeme == "^" {
            let operator = self.eat().lexeme;
            let right = self.parse_unary_expr(in_function, in_loop)?;

            left = Expr::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        if self.at().token_type == TokenType::BinaryOperator
            && (self.at().lexeme == "+" || self.at().lexeme == "-")
        {
            let operator = self.eat().lexeme;
            let right = self.parse_primary_expr(in_function, in_loop)?;

            return Ok(Expr::Unary {
                operator,
                right: Box::new(right),
            });
        }

        self.parse_call_member_expr(in_function, in_loop)
    }

    fn parse_call_member_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let member = self.parse_member_expr(in_function, in_loop)?;

        if self.at().token_type == TokenType::OpenParen {
            return self.parse_call_expr(member);
        }

        Ok(member)
    }

    /// Right-recursive so chained calls `f()()` nest naturally.
    fn parse_call_expr(&mut self, caller: Expr) -> Result<Expr> {
        let call = Expr::Call {
            caller: Box::new(caller),
            args: self.parse_args()?,
        };

        if self.at().token_type == TokenType::OpenParen {
            return self.parse_call_expr(call);
        }

        Ok(call)
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>> {
        self.expect(TokenType::OpenParen, "Expected open parenthesis")?;

        let args = if self.at().token_type == TokenType::CloseParen {
            Vec::new()
        } else {
            self.parse_args_list()?
        };

        self.expect(TokenType::CloseParen, "Missing ) inside argument list")?;

        Ok(args)
    }

    /// Argument expressions parse with fresh flags: a bare `break` or
    /// `return` inside an argument list is always rejected.
    fn parse_args_list(&mut self) -> Result<Vec<Expr>> {
        let mut args = vec![self.parse_assignment_expr(false, false)?];

        while self.at().token_type == TokenType::Comma {
            self.eat();
            args.push(self.parse_assignment_expr(false, false)?);
        }

        Ok(args)
    }

    fn parse_member_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        let mut object = self.parse_str_or_arr_literal(in_function, in_loop)?;

        while self.at().token_type == TokenType::Dot
            || self.at().token_type == TokenType::OpenBracket
        {
            let operator = self.eat();

            let (property, computed) = if operator.token_type == TokenType::Dot {
                let property = self.parse_primary_expr(in_function, in_loop)?;

                if !matches!(property, Expr::Identifier(_)) {
                    return Err(QuillError::parse(
                        operator.line,
                        "Cannot use dot operator without right side being an identifier",
                    ));
                }

                (property, false)
            } else {
                let property = self.parse_assignment_expr(in_function, in_loop)?;
                self.expect(TokenType::CloseBracket, "Missing ] in computed value")?;

                (property, true)
            };

            object = Expr::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed,
            };
        }

        Ok(object)
    }

    /// String literals (text between two quote-mark tokens, concatenated
    /// verbatim) and array literals; anything else falls to primary.
    fn parse_str_or_arr_literal(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        if self.at().token_type == TokenType::QuotationMark {
            self.eat();

            let mut value = String::new();

            while self.at().token_type != TokenType::Eof
                && self.at().token_type != TokenType::QuotationMark
            {
                value.push_str(&self.eat().lexeme);
            }

            self.expect(TokenType::QuotationMark, "Unclosed Quote")?;

            return Ok(Expr::StringLiteral(value));
        }

        if self.at().token_type == TokenType::OpenBracket {
            self.eat();

            let mut elements: Vec<Expr> = Vec::new();

            while self.at().token_type != TokenType::Eof
                && self.at().token_type != TokenType::CloseBracket
            {
                if self.at().token_type == TokenType::Comma {
                    self.eat();
                }

                elements.push(self.parse_assignment_expr(in_function, in_loop)?);
            }

            self.expect(TokenType::CloseBracket, "Expected closing bracket")?;

            return Ok(Expr::ArrayLiteral(elements));
        }

        self.parse_primary_expr(in_function, in_loop)
    }

    fn parse_primary_expr(&mut self, in_function: bool, in_loop: bool) -> Result<Expr> {
        match self.at().token_type {
            TokenType::Break | TokenType::Continue => {
                if !in_loop {
                    return Err(QuillError::parse(
                        self.at().line,
                        format!(
                            "{} statement is unallowed outside of loops",
                            self.at().lexeme
                        ),
                    ));
                }

                let eaten = self.eat();

                Ok(if eaten.token_type == TokenType::Continue {
                    Expr::Continue
                } else {
                    Expr::Break
                })
            }

            TokenType::Return => {
                let keyword = self.eat();

                if !in_function {
                    return Err(QuillError::parse(
                        keyword.line,
                        "return statement is unallowed outside of functions",
                    ));
                }

                let value = self.parse_assignment_expr(false, false)?;

                Ok(Expr::Return(Box::new(value)))
            }

            TokenType::Identifier => Ok(Expr::Identifier(self.eat().lexeme)),

            TokenType::Number => {
                let token = self.eat();

                let value: f64 = token.lexeme.parse().map_err(|_| {
                    QuillError::parse(
                        token.line,
                        format!("Invalid number literal '{}'", token.lexeme),
                    )
                })?;

                Ok(Expr::NumericLiteral(value))
            }

            TokenType::Null => {
                self.eat();
                Ok(Expr::Null)
            }

            TokenType::Boolean => Ok(Expr::BoolLiteral(self.eat().lexeme == "true")),

            TokenType::Unassigned => {
                self.eat();
                Ok(Expr::Unassigned)
            }

            TokenType::OpenParen => {
                self.eat();

                let value = self.parse_assignment_expr(in_function, false)?;
                self.expect(TokenType::CloseParen, "Unclosed Parenthesis")?;

                Ok(value)
            }

            _ => Err(QuillError::parse(
                self.at().line,
                format!("Unexpected token '{}'", self.at().lexeme),
            )),
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
