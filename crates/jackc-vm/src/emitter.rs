//! Textual VM instruction emission.
//!
//! `Emitter` is a pure text producer: it never touches the filesystem and
//! never inspects symbol tables or grammar. The parser is the only caller,
//! and it is responsible for choosing the right segment, index, and
//! operator — the emitter just formats what it's told.
//!
//! Indentation is bumped on `function` and popped on `return`; it exists
//! purely so emitted `.vm` files read like a human wrote them; a downstream
//! VM translator must ignore leading whitespace.

use crate::segment::{ArithOp, Segment};

const INDENT_WIDTH: usize = 2;

#[derive(Default)]
pub struct Emitter {
    buf: String,
    indent: usize,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent * INDENT_WIDTH {
            self.buf.push(' ');
        }
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    pub fn push(&mut self, segment: Segment, index: usize) {
        self.line(&format!("push {segment} {index}"));
    }

    pub fn pop(&mut self, segment: Segment, index: usize) {
        self.line(&format!("pop {segment} {index}"));
    }

    pub fn arithmetic(&mut self, op: ArithOp) {
        self.line(&op.to_string());
    }

    pub fn label(&mut self, name: &str) {
        self.line(&format!("label {name}"));
    }

    pub fn goto(&mut self, name: &str) {
        self.line(&format!("goto {name}"));
    }

    pub fn if_goto(&mut self, name: &str) {
        self.line(&format!("if-goto {name}"));
    }

    /// `call Class.sub n` — `n` always includes the implicit `this` push
    /// for method calls; the caller (the parser) has already accounted for
    /// that when computing `n`.
    pub fn call(&mut self, qualified_name: &str, n_args: usize) {
        self.line(&format!("call {qualified_name} {n_args}"));
    }

    /// `function Class.sub n` — `n` is the local-variable count, never the
    /// argument count. Bumps the indent level for the subroutine body.
    pub fn function(&mut self, qualified_name: &str, n_locals: usize) {
        self.line(&format!("function {qualified_name} {n_locals}"));
        self.indent += 1;
    }

    /// Pops the indent level bumped by [`function`](Self::function).
    pub fn vm_return(&mut self) {
        self.line("return");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Consumes the emitter, returning the accumulated VM text.
    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_push_and_pop_with_segment_names() {
        let mut e = Emitter::new();
        e.push(Segment::Constant, 7);
        e.pop(Segment::Local, 2);
        assert_eq!(e.finish(), "push constant 7\npop local 2\n");
    }

    #[test]
    fn emits_all_arithmetic_ops() {
        let mut e = Emitter::new();
        for op in [
            ArithOp::Add,
            ArithOp::Sub,
            ArithOp::Neg,
            ArithOp::Eq,
            ArithOp::Gt,
            ArithOp::Lt,
            ArithOp::And,
            ArithOp::Or,
            ArithOp::Not,
        ] {
            e.arithmetic(op);
        }
        let text = e.finish();
        for expect in ["add", "sub", "neg", "eq", "gt", "lt", "and", "or", "not"] {
            assert!(text.lines().any(|l| l.trim() == expect));
        }
    }

    #[test]
    fn function_indents_body_and_return_dedents() {
        let mut e = Emitter::new();
        e.function("Main.main", 0);
        e.push(Segment::Constant, 0);
        e.vm_return();
        let text = e.finish();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "function Main.main 0");
        assert!(lines[1].starts_with("  push"));
        assert_eq!(lines[2], "  return");
    }

    #[test]
    fn call_and_labels_format_correctly() {
        let mut e = Emitter::new();
        e.call("Math.multiply", 2);
        e.label("IF_ELSE0");
        e.goto("IF_END0");
        e.if_goto("IF_ELSE0");
        assert_eq!(
            e.finish(),
            "call Math.multiply 2\nlabel IF_ELSE0\ngoto IF_END0\nif-goto IF_ELSE0\n"
        );
    }
}
