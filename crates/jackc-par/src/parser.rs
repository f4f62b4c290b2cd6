//! The recursive-descent parser / code generator.
//!
//! This is a single-pass compiler: there is no intermediate syntax tree.
//! Each grammar production is one method, and each method emits its VM
//! instructions inline as it recognizes the construct — the class's
//! `Emitter` buffer *is* the output, built up in traversal order. Jack's
//! grammar needs one token of lookahead everywhere except the identifier
//! term, which needs two (is the next token `(`/`.`, `[`, or neither); that
//! is plain lookahead, not backtracking, so no speculative rewind is
//! exercised in this implementation (see `TokenCursor::mark`/`rewind` in
//! `jackc-lex`, which stays available for a grammar extension that would
//! need it).

use jackc_lex::{Keyword, Lexer, Symbol, Token, TokenCursor, TokenKind};
use jackc_sym::{Kind, ResolvedSymbol, SymbolTable};
use jackc_vm::{ArithOp, Emitter, Segment};

use crate::error::{CompileError, CompileResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubroutineFlavor {
    Constructor,
    Function,
    Method,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Lt,
    Gt,
    Eq,
}

/// Maps a symbol-table [`Kind`] to the VM segment the parser pushes/pops
/// when reading or writing a variable of that kind (spec §4.3's kind →
/// segment table).
fn segment_of(kind: Kind) -> Segment {
    match kind {
        Kind::Static => Segment::Static,
        Kind::Field => Segment::This,
        Kind::Arg => Segment::Argument,
        Kind::Var => Segment::Local,
    }
}

/// Compiles one Jack class from source text to VM assembly text. This is
/// the crate's one entry point; the driver owns everything upstream (file
/// I/O, directory walking) and downstream (writing the result out).
pub fn compile(source: &str) -> CompileResult<String> {
    let tokens = Lexer::tokenize(source)?;
    let mut parser = Parser::new(&tokens);
    parser.compile_class()?;
    if parser.cursor.more() {
        let line = parser.current_line();
        let found = parser.current_kind();
        return Err(CompileError::Parse {
            expected: "end of input".to_string(),
            found: Parser::describe(&found),
            line,
        });
    }
    Ok(parser.emitter.finish())
}

struct Parser<'a> {
    cursor: TokenCursor<'a>,
    symbols: SymbolTable,
    emitter: Emitter,
    class_name: String,
    /// Minted from a single counter per class (spec's resolution of the
    /// source's `if`-vs-`while` counter ambiguity): never reused within a
    /// class, reset for each new one since a `Parser` compiles exactly one
    /// class.
    label_counter: u32,
    /// The enclosing subroutine's declared return type; `"void"` triggers
    /// the mandatory `push constant 0` before `return`.
    current_return_type: String,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            cursor: TokenCursor::new(tokens),
            symbols: SymbolTable::new(),
            emitter: Emitter::new(),
            class_name: String::new(),
            label_counter: 0,
            current_return_type: String::new(),
        }
    }

    // ---- token-level helpers -------------------------------------------------

    fn current_kind(&self) -> Option<TokenKind> {
        self.cursor.peek().map(|t| t.kind.clone())
    }

    fn current_line(&self) -> u32 {
        self.cursor.line()
    }

    fn peek_is_symbol(&self, sym: Symbol) -> bool {
        matches!(self.current_kind(), Some(TokenKind::Symbol(s)) if s == sym)
    }

    fn peek_is_keyword(&self, kw: Keyword) -> bool {
        matches!(self.current_kind(), Some(TokenKind::Keyword(k)) if k == kw)
    }

    fn describe(kind: &Option<TokenKind>) -> String {
        match kind {
            Some(k) => format!("{} '{}'", k.describe(), k),
            None => "end of input".to_string(),
        }
    }

    fn mismatch<T>(&self, expected: impl Into<String>, found: Option<TokenKind>, line: u32) -> CompileResult<T> {
        let expected = expected.into();
        if found.is_none() {
            Err(CompileError::UnexpectedEof { expected, line })
        } else {
            Err(CompileError::Parse {
                expected,
                found: Self::describe(&found),
                line,
            })
        }
    }

    fn expect_symbol(&mut self, sym: Symbol) -> CompileResult<()> {
        let line = self.current_line();
        let found = self.current_kind();
        if matches!(&found, Some(TokenKind::Symbol(s)) if *s == sym) {
            self.cursor.advance();
            Ok(())
        } else {
            self.mismatch(format!("'{sym}'"), found, line)
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> CompileResult<()> {
        let line = self.current_line();
        let found = self.current_kind();
        if matches!(&found, Some(TokenKind::Keyword(k)) if *k == kw) {
            self.cursor.advance();
            Ok(())
        } else {
            self.mismatch(format!("'{kw}'"), found, line)
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<String> {
        let line = self.current_line();
        match self.current_kind() {
            Some(TokenKind::Identifier(name)) => {
                self.cursor.advance();
                Ok(name)
            }
            found => self.mismatch("an identifier", found, line),
        }
    }

    /// A Jack type: `int`, `char`, `boolean`, or a class name.
    fn expect_type(&mut self) -> CompileResult<String> {
        let line = self.current_line();
        match self.current_kind() {
            Some(TokenKind::Keyword(Keyword::Int)) => {
                self.cursor.advance();
                Ok("int".to_string())
            }
            Some(TokenKind::Keyword(Keyword::Char)) => {
                self.cursor.advance();
                Ok("char".to_string())
            }
            Some(TokenKind::Keyword(Keyword::Boolean)) => {
                self.cursor.advance();
                Ok("boolean".to_string())
            }
            Some(TokenKind::Identifier(name)) => {
                self.cursor.advance();
                Ok(name)
            }
            found => self.mismatch("a type", found, line),
        }
    }

    fn define(&mut self, name: &str, ty: &str, kind: Kind, line: u32) -> CompileResult<usize> {
        self.symbols
            .define(name, ty, kind)
            .map_err(|source| CompileError::Symbol { source, line })
    }

    fn resolve(&self, name: &str, line: u32) -> CompileResult<ResolvedSymbol> {
        self.symbols.resolve(name).ok_or_else(|| CompileError::UndefinedVariable {
            name: name.to_string(),
            line,
        })
    }

    fn mint_label(&mut self) -> u32 {
        let n = self.label_counter;
        self.label_counter += 1;
        n
    }

    /// Runs `f` speculatively: on `Err`, the cursor rewinds to where it
    /// stood before `f` ran, as if `f` had never touched it; on `Ok`, the
    /// mark is committed. Jack's grammar resolves every lookahead point
    /// (including the identifier term) with plain one- or two-token
    /// lookahead, so no production in this file currently needs to call
    /// this — it exists as the backtracking escape hatch `TokenCursor`'s
    /// mark/rewind is built for.
    #[allow(dead_code)]
    fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> CompileResult<T>) -> CompileResult<T> {
        self.cursor.mark();
        match f(self) {
            Ok(value) => {
                self.cursor.commit();
                Ok(value)
            }
            Err(err) => {
                self.cursor.rewind();
                Err(err)
            }
        }
    }

    // ---- class-level grammar --------------------------------------------------

    fn compile_class(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::Class)?;
        let name = self.expect_identifier()?;
        self.class_name = name;
        self.expect_symbol(Symbol::LBrace)?;

        while self.peek_is_keyword(Keyword::Static) || self.peek_is_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.peek_is_keyword(Keyword::Constructor)
            || self.peek_is_keyword(Keyword::Function)
            || self.peek_is_keyword(Keyword::Method)
        {
            self.compile_subroutine()?;
        }

        self.expect_symbol(Symbol::RBrace)
    }

    fn compile_class_var_dec(&mut self) -> CompileResult<()> {
        let kind = if self.peek_is_keyword(Keyword::Static) {
            self.cursor.advance();
            Kind::Static
        } else {
            self.expect_keyword(Keyword::Field)?;
            Kind::Field
        };

        let ty = self.expect_type()?;
        loop {
            let line = self.current_line();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, kind, line)?;
            if self.peek_is_symbol(Symbol::Comma) {
                self.cursor.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(Symbol::Semicolon)
    }

    // ---- subroutine-level grammar ----------------------------------------------

    fn compile_subroutine(&mut self) -> CompileResult<()> {
        let flavor = if self.peek_is_keyword(Keyword::Constructor) {
            SubroutineFlavor::Constructor
        } else if self.peek_is_keyword(Keyword::Function) {
            SubroutineFlavor::Function
        } else {
            SubroutineFlavor::Method
        };
        self.cursor.advance();

        self.symbols.start_subroutine();
        if flavor == SubroutineFlavor::Method {
            let class_name = self.class_name.clone();
            self.symbols
                .define("this", &class_name, Kind::Arg)
                .expect("a freshly reset subroutine scope cannot already bind 'this'");
        }

        let return_type = if self.peek_is_keyword(Keyword::Void) {
            self.cursor.advance();
            "void".to_string()
        } else {
            self.expect_type()?
        };
        let name = self.expect_identifier()?;

        self.expect_symbol(Symbol::LParen)?;
        self.compile_parameter_list()?;
        self.expect_symbol(Symbol::RParen)?;
        self.expect_symbol(Symbol::LBrace)?;

        while self.peek_is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        // The local count is only known once every `var` has been seen, so
        // `function` is emitted here — after locals, before statements.
        let n_locals = self.symbols.count(Kind::Var);
        self.emitter
            .function(&format!("{}.{}", self.class_name, name), n_locals);

        match flavor {
            SubroutineFlavor::Constructor => {
                let n_fields = self.symbols.count(Kind::Field);
                self.emitter.push(Segment::Constant, n_fields);
                self.emitter.call("Memory.alloc", 1);
                self.emitter.pop(Segment::Pointer, 0);
            }
            SubroutineFlavor::Method => {
                self.emitter.push(Segment::Argument, 0);
                self.emitter.pop(Segment::Pointer, 0);
            }
            SubroutineFlavor::Function => {}
        }

        self.current_return_type = return_type;
        self.compile_statements()?;
        self.expect_symbol(Symbol::RBrace)
    }

    fn compile_parameter_list(&mut self) -> CompileResult<()> {
        if self.peek_is_symbol(Symbol::RParen) {
            return Ok(());
        }
        loop {
            let ty = self.expect_type()?;
            let line = self.current_line();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, Kind::Arg, line)?;
            if self.peek_is_symbol(Symbol::Comma) {
                self.cursor.advance();
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_var_dec(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::Var)?;
        let ty = self.expect_type()?;
        loop {
            let line = self.current_line();
            let name = self.expect_identifier()?;
            self.define(&name, &ty, Kind::Var, line)?;
            if self.peek_is_symbol(Symbol::Comma) {
                self.cursor.advance();
                continue;
            }
            break;
        }
        self.expect_symbol(Symbol::Semicolon)
    }

    // ---- statements --------------------------------------------------------

    fn compile_statements(&mut self) -> CompileResult<()> {
        loop {
            match self.current_kind() {
                Some(TokenKind::Keyword(Keyword::Let)) => self.compile_let()?,
                Some(TokenKind::Keyword(Keyword::If)) => self.compile_if()?,
                Some(TokenKind::Keyword(Keyword::While)) => self.compile_while()?,
                Some(TokenKind::Keyword(Keyword::Do)) => self.compile_do()?,
                Some(TokenKind::Keyword(Keyword::Return)) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::Let)?;
        let line = self.current_line();
        let name = self.expect_identifier()?;
        let resolved = self.resolve(&name, line)?;
        let segment = segment_of(resolved.kind);

        if self.peek_is_symbol(Symbol::LBracket) {
            self.cursor.advance();
            self.emitter.push(segment, resolved.index);
            self.compile_expression()?;
            self.expect_symbol(Symbol::RBracket)?;
            self.emitter.arithmetic(ArithOp::Add);
            self.expect_symbol(Symbol::Eq)?;
            self.compile_expression()?;
            self.expect_symbol(Symbol::Semicolon)?;

            // The RHS may itself dereference `that`, so it is compiled
            // before `pointer 1` is retargeted — fixing `that` first would
            // let the RHS clobber the element we're about to write.
            self.emitter.pop(Segment::Temp, 0);
            self.emitter.pop(Segment::Pointer, 1);
            self.emitter.push(Segment::Temp, 0);
            self.emitter.pop(Segment::That, 0);
        } else {
            self.expect_symbol(Symbol::Eq)?;
            self.compile_expression()?;
            self.expect_symbol(Symbol::Semicolon)?;
            self.emitter.pop(segment, resolved.index);
        }
        Ok(())
    }

    fn compile_if(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol(Symbol::LParen)?;
        self.compile_expression()?;
        self.expect_symbol(Symbol::RParen)?;

        let n = self.mint_label();
        let else_label = format!("IF_ELSE{n}");
        let end_label = format!("IF_END{n}");

        self.emitter.arithmetic(ArithOp::Not);
        self.emitter.if_goto(&else_label);

        self.expect_symbol(Symbol::LBrace)?;
        self.compile_statements()?;
        self.expect_symbol(Symbol::RBrace)?;
        self.emitter.goto(&end_label);
        self.emitter.label(&else_label);

        if self.peek_is_keyword(Keyword::Else) {
            self.cursor.advance();
            self.expect_symbol(Symbol::LBrace)?;
            self.compile_statements()?;
            self.expect_symbol(Symbol::RBrace)?;
        }
        self.emitter.label(&end_label);
        Ok(())
    }

    fn compile_while(&mut self) -> CompileResult<()> {
        let n = self.mint_label();
        let top_label = format!("WHILE_EXP{n}");
        let end_label = format!("WHILE_END{n}");

        self.emitter.label(&top_label);
        self.expect_keyword(Keyword::While)?;
        self.expect_symbol(Symbol::LParen)?;
        self.compile_expression()?;
        self.expect_symbol(Symbol::RParen)?;
        self.emitter.arithmetic(ArithOp::Not);
        self.emitter.if_goto(&end_label);

        self.expect_symbol(Symbol::LBrace)?;
        self.compile_statements()?;
        self.expect_symbol(Symbol::RBrace)?;
        self.emitter.goto(&top_label);
        self.emitter.label(&end_label);
        Ok(())
    }

    fn compile_do(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::Do)?;
        let name = self.expect_identifier()?;
        self.compile_subroutine_call(name)?;
        self.expect_symbol(Symbol::Semicolon)?;
        // A `do` always discards the callee's return value.
        self.emitter.pop(Segment::Temp, 0);
        Ok(())
    }

    fn compile_return(&mut self) -> CompileResult<()> {
        self.expect_keyword(Keyword::Return)?;
        if self.current_return_type == "void" {
            self.emitter.push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(Symbol::Semicolon)?;
        self.emitter.vm_return();
        Ok(())
    }

    // ---- expressions --------------------------------------------------------

    /// `term (op term)*`, left-associative, with no operator precedence —
    /// Jack's specified semantics.
    fn compile_expression(&mut self) -> CompileResult<()> {
        self.compile_term()?;
        loop {
            let op = match self.current_kind() {
                Some(TokenKind::Symbol(Symbol::Plus)) => BinOp::Add,
                Some(TokenKind::Symbol(Symbol::Minus)) => BinOp::Sub,
                Some(TokenKind::Symbol(Symbol::Star)) => BinOp::Mul,
                Some(TokenKind::Symbol(Symbol::Slash)) => BinOp::Div,
                Some(TokenKind::Symbol(Symbol::And)) => BinOp::And,
                Some(TokenKind::Symbol(Symbol::Or)) => BinOp::Or,
                Some(TokenKind::Symbol(Symbol::Lt)) => BinOp::Lt,
                Some(TokenKind::Symbol(Symbol::Gt)) => BinOp::Gt,
                Some(TokenKind::Symbol(Symbol::Eq)) => BinOp::Eq,
                _ => break,
            };
            self.cursor.advance();
            self.compile_term()?;
            match op {
                BinOp::Add => self.emitter.arithmetic(ArithOp::Add),
                BinOp::Sub => self.emitter.arithmetic(ArithOp::Sub),
                BinOp::And => self.emitter.arithmetic(ArithOp::And),
                BinOp::Or => self.emitter.arithmetic(ArithOp::Or),
                BinOp::Lt => self.emitter.arithmetic(ArithOp::Lt),
                BinOp::Gt => self.emitter.arithmetic(ArithOp::Gt),
                BinOp::Eq => self.emitter.arithmetic(ArithOp::Eq),
                BinOp::Mul => self.emitter.call("Math.multiply", 2),
                BinOp::Div => self.emitter.call("Math.divide", 2),
            }
        }
        Ok(())
    }

    fn compile_term(&mut self) -> CompileResult<()> {
        let line = self.current_line();
        match self.current_kind() {
            Some(TokenKind::IntegerConstant(n)) => {
                self.cursor.advance();
                self.emitter.push(Segment::Constant, n as usize);
            }
            Some(TokenKind::StringConstant(s)) => {
                self.cursor.advance();
                self.emitter.push(Segment::Constant, s.chars().count());
                self.emitter.call("String.new", 1);
                for ch in s.chars() {
                    self.emitter.push(Segment::Constant, ch as usize);
                    self.emitter.call("String.appendChar", 2);
                }
            }
            Some(TokenKind::Keyword(Keyword::True)) => {
                self.cursor.advance();
                self.emitter.push(Segment::Constant, 0);
                self.emitter.arithmetic(ArithOp::Not);
            }
            Some(TokenKind::Keyword(Keyword::False)) | Some(TokenKind::Keyword(Keyword::Null)) => {
                self.cursor.advance();
                self.emitter.push(Segment::Constant, 0);
            }
            Some(TokenKind::Keyword(Keyword::This)) => {
                self.cursor.advance();
                self.emitter.push(Segment::Pointer, 0);
            }
            Some(TokenKind::Symbol(Symbol::LParen)) => {
                self.cursor.advance();
                self.compile_expression()?;
                self.expect_symbol(Symbol::RParen)?;
            }
            Some(TokenKind::Symbol(Symbol::Minus)) => {
                self.cursor.advance();
                self.compile_term()?;
                self.emitter.arithmetic(ArithOp::Neg);
            }
            Some(TokenKind::Symbol(Symbol::Not)) => {
                self.cursor.advance();
                self.compile_term()?;
                self.emitter.arithmetic(ArithOp::Not);
            }
            Some(TokenKind::Identifier(name)) => {
                self.cursor.advance();
                match self.current_kind() {
                    Some(TokenKind::Symbol(Symbol::LParen)) | Some(TokenKind::Symbol(Symbol::Dot)) => {
                        self.compile_subroutine_call(name)?;
                    }
                    Some(TokenKind::Symbol(Symbol::LBracket)) => {
                        self.compile_array_access(&name, line)?;
                    }
                    _ => {
                        let resolved = self.resolve(&name, line)?;
                        self.emitter.push(segment_of(resolved.kind), resolved.index);
                    }
                }
            }
            found => return self.mismatch("a term", found, line),
        }
        Ok(())
    }

    /// `name '[' expr ']'` read: push the base, add the index, retarget
    /// `that`, push the element.
    fn compile_array_access(&mut self, name: &str, line: u32) -> CompileResult<()> {
        let resolved = self.resolve(name, line)?;
        self.emitter.push(segment_of(resolved.kind), resolved.index);
        self.expect_symbol(Symbol::LBracket)?;
        self.compile_expression()?;
        self.expect_symbol(Symbol::RBracket)?;
        self.emitter.arithmetic(ArithOp::Add);
        self.emitter.pop(Segment::Pointer, 1);
        self.emitter.push(Segment::That, 0);
        Ok(())
    }

    /// The two subroutine-call forms that share an identifier first token:
    /// `first(args)` is always a method call on the current object;
    /// `first.second(args)` is a method call on `first` if `first` resolves
    /// to a variable, otherwise a function/constructor call on class
    /// `first`.
    fn compile_subroutine_call(&mut self, first: String) -> CompileResult<()> {
        if self.peek_is_symbol(Symbol::Dot) {
            self.cursor.advance();
            let second = self.expect_identifier()?;

            if let Some(resolved) = self.symbols.resolve(&first) {
                self.emitter.push(segment_of(resolved.kind), resolved.index);
                self.expect_symbol(Symbol::LParen)?;
                let n = self.compile_expression_list()?;
                self.expect_symbol(Symbol::RParen)?;
                self.emitter.call(&format!("{}.{}", resolved.ty, second), n + 1);
            } else {
                self.expect_symbol(Symbol::LParen)?;
                let n = self.compile_expression_list()?;
                self.expect_symbol(Symbol::RParen)?;
                self.emitter.call(&format!("{first}.{second}"), n);
            }
        } else {
            // A bare call is always a method call on the current object.
            self.emitter.push(Segment::Pointer, 0);
            self.expect_symbol(Symbol::LParen)?;
            let n = self.compile_expression_list()?;
            self.expect_symbol(Symbol::RParen)?;
            self.emitter.call(&format!("{}.{}", self.class_name, first), n + 1);
        }
        Ok(())
    }

    fn compile_expression_list(&mut self) -> CompileResult<usize> {
        if self.peek_is_symbol(Symbol::RParen) {
            return Ok(0);
        }
        let mut n = 0;
        loop {
            self.compile_expression()?;
            n += 1;
            if self.peek_is_symbol(Symbol::Comma) {
                self.cursor.advance();
                continue;
            }
            break;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(vm: &str) -> Vec<&str> {
        vm.lines().map(|l| l.trim()).collect()
    }

    /// The emitter indents subroutine bodies for readability; tests that
    /// check for an adjacent-lines substring need the indentation stripped
    /// first so they don't depend on nesting depth.
    fn norm(vm: &str) -> String {
        lines(vm).join("\n")
    }

    /// S1 — void function, single statement.
    #[test]
    fn void_function_single_statement() {
        let vm = compile("class Main { function void main() { return; } }").unwrap();
        assert_eq!(lines(&vm), vec!["function Main.main 0", "push constant 0", "return"]);
    }

    /// S2 — constructor with fields.
    #[test]
    fn constructor_with_fields() {
        let src = "class P { field int x, y; constructor P new(int ax, int ay) \
                   { let x = ax; let y = ay; return this; } }";
        let vm = compile(src).unwrap();
        assert_eq!(
            lines(&vm),
            vec![
                "function P.new 0",
                "push constant 2",
                "call Memory.alloc 1",
                "pop pointer 0",
                "push argument 0",
                "pop this 0",
                "push argument 1",
                "pop this 1",
                "push pointer 0",
                "return",
            ]
        );
    }

    /// S3 — method call on an object field.
    #[test]
    fn method_call_on_object_field() {
        let src = "class C { field P p; method void go() { do p.move(1, 2); return; } }";
        let vm = compile(src).unwrap();
        let ls = lines(&vm);
        let do_start = ls.iter().position(|l| *l == "push this 0").unwrap();
        assert_eq!(
            &ls[do_start..do_start + 5],
            &["push this 0", "push constant 1", "push constant 2", "call P.move 3", "pop temp 0"]
        );
    }

    /// S4 — while loop with array store.
    #[test]
    fn while_loop_with_array_store() {
        let src = "class A { function void f() { var Array a; var int i; let i = 0; \
                   while (i < 10) { let a[i] = i; let i = i + 1; } return; } }";
        let vm = compile(src).unwrap();
        assert!(vm.starts_with("function A.f 2\n"));
        let norm = norm(&vm);
        assert!(norm.contains("label WHILE_EXP0"));
        assert!(norm.contains("label WHILE_END0"));
        assert!(norm.contains("pop temp 0\npop pointer 1\npush temp 0\npop that 0"));
        assert!(norm.ends_with("push constant 0\nreturn"));
    }

    /// S5 — string constant.
    #[test]
    fn string_constant_expands_to_appendchar_calls() {
        let src = "class Main { function void main() { do Output.printString(\"Hi\"); return; } }";
        let vm = compile(src).unwrap();
        assert!(norm(&vm).contains(
            "push constant 2\ncall String.new 1\npush constant 72\ncall String.appendChar 2\n\
             push constant 105\ncall String.appendChar 2"
        ));
    }

    /// S6 — no operator precedence: strict left-to-right evaluation.
    #[test]
    fn no_operator_precedence() {
        let src = "class Main { function void main() { do f(1 + 2 * 3); return; } }";
        let vm = compile(src).unwrap();
        assert!(norm(&vm).contains(
            "push constant 1\npush constant 2\nadd\npush constant 3\ncall Math.multiply 2"
        ));
    }

    #[test]
    fn if_else_brackets_labels_correctly() {
        let src = "class Main { function void main() { var int x; if (true) \
                   { let x = 1; } else { let x = 2; } return; } }";
        let vm = compile(src).unwrap();
        assert!(vm.contains("if-goto IF_ELSE0"));
        assert!(vm.contains("goto IF_END0"));
        assert!(vm.contains("label IF_ELSE0"));
        assert!(vm.contains("label IF_END0"));
    }

    #[test]
    fn if_without_else_has_empty_else_region() {
        let src = "class Main { function void main() { var int x; if (true) { let x = 1; } return; } }";
        let vm = compile(src).unwrap();
        let ls = lines(&vm);
        let else_pos = ls.iter().position(|l| *l == "label IF_ELSE0").unwrap();
        let end_pos = ls.iter().position(|l| *l == "label IF_END0").unwrap();
        assert_eq!(end_pos, else_pos + 1);
    }

    #[test]
    fn labels_are_per_class_monotonic_not_per_subroutine() {
        let src = "class Main { function void a() { if (true) { } return; } \
                   function void b() { if (true) { } return; } }";
        let vm = compile(src).unwrap();
        assert!(vm.contains("IF_ELSE0"));
        assert!(vm.contains("IF_ELSE1"));
    }

    #[test]
    fn function_call_on_class_name_not_in_scope() {
        let src = "class Main { function void main() { do Sys.halt(); return; } }";
        let vm = compile(src).unwrap();
        assert!(vm.contains("call Sys.halt 0"));
    }

    #[test]
    fn undefined_variable_in_let_is_a_symbol_error() {
        let src = "class Main { function void main() { let x = 1; return; } }";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::UndefinedVariable { .. }));
    }

    #[test]
    fn duplicate_definition_is_a_symbol_error() {
        let src = "class Main { function void main() { var int x, x; return; } }";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::Symbol { .. }));
    }

    #[test]
    fn token_mismatch_reports_expected_and_found() {
        let src = "class Main { function void main( return; } }";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::Parse { .. }));
    }

    #[test]
    fn unexpected_eof_is_reported() {
        let src = "class Main { function void main() { return;";
        let err = compile(src).unwrap_err();
        assert!(matches!(err, CompileError::UnexpectedEof { .. }));
    }

    #[test]
    fn lex_error_propagates_through_compile() {
        let src = "class Main { function void main() { let x = 1abc; return; } }";
        let err = compile(src).unwrap_err();
        assert_eq!(err.category(), crate::error::ErrorCategory::Lex);
    }

    #[test]
    fn try_parse_rewinds_the_cursor_on_failure() {
        let tokens = jackc_lex::Lexer::tokenize("class Main { }").unwrap();
        let mut parser = Parser::new(&tokens);
        let before = parser.cursor.position();

        let result = parser.try_parse(|p| {
            p.expect_keyword(Keyword::Class)?;
            p.expect_identifier()?;
            p.expect_symbol(Symbol::LParen) // wrong: next token is '{'
        });

        assert!(result.is_err());
        assert_eq!(parser.cursor.position(), before);
    }

    #[test]
    fn try_parse_commits_the_cursor_on_success() {
        let tokens = jackc_lex::Lexer::tokenize("class Main { }").unwrap();
        let mut parser = Parser::new(&tokens);

        let result = parser.try_parse(|p| p.expect_keyword(Keyword::Class));

        assert!(result.is_ok());
        assert_eq!(parser.cursor.position(), 1);
    }
}
