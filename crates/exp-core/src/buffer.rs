//! `CodeBuffer`: destino de texto con indentación explícita.
//!
//! Los hooks de emisión escriben líneas al nivel de indentación actual y
//! ajustan el nivel de forma relativa. El ensamblador verifica que cada hook
//! deje el nivel igual que lo encontró (invariante de balance).

use crate::constants::INDENT_UNIT;

#[derive(Debug, Default)]
pub struct CodeBuffer {
    out: String,
    indent: usize,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indent_level(&self) -> usize {
        self.indent
    }

    /// Ajuste relativo del nivel de indentación. Nunca baja de cero.
    pub fn set_indent(&mut self, delta: i32) {
        if delta >= 0 {
            self.indent += delta as usize;
        } else {
            self.indent = self.indent.saturating_sub((-delta) as usize);
        }
    }

    /// Escribe una línea al nivel actual y añade el salto de línea.
    pub fn write_indented(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str(INDENT_UNIT);
            }
            self.out.push_str(line);
        }
        self.out.push('\n');
    }

    /// Escribe un bloque multi-línea indentando cada línea no vacía.
    pub fn write_indented_lines(&mut self, text: &str) {
        for line in text.split('\n') {
            self.write_indented(line);
        }
    }

    /// Cierra un bloque de llaves: baja un nivel y escribe `}`.
    pub fn close_block(&mut self) {
        self.set_indent(-1);
        self.write_indented("}");
    }

    pub fn blank_line(&mut self) {
        self.out.push('\n');
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_each_written_line() {
        let mut buff = CodeBuffer::new();
        buff.write_indented("a = 1");
        buff.set_indent(1);
        buff.write_indented("b = 2");
        buff.set_indent(-1);
        buff.write_indented("c = 3");
        assert_eq!(buff.as_str(), "a = 1\n    b = 2\nc = 3\n");
    }

    #[test]
    fn close_block_dedents_before_the_brace() {
        let mut buff = CodeBuffer::new();
        buff.write_indented("if (ok) {");
        buff.set_indent(1);
        buff.write_indented("go();");
        buff.close_block();
        assert_eq!(buff.as_str(), "if (ok) {\n    go();\n}\n");
    }

    #[test]
    fn indent_never_goes_negative() {
        let mut buff = CodeBuffer::new();
        buff.set_indent(-3);
        assert_eq!(buff.indent_level(), 0);
    }

    #[test]
    fn multiline_blocks_skip_empty_lines() {
        let mut buff = CodeBuffer::new();
        buff.set_indent(1);
        buff.write_indented_lines("x = 1\n\ny = 2");
        assert_eq!(buff.as_str(), "    x = 1\n\n    y = 2\n");
    }
}
