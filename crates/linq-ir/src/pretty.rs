//! Render compiled programs back to source text.

use crate::ir::{register_name, Instruction, Program, Register};
use std::fmt;

/// Source line for one register, with its `x <- ` prefix.
pub fn render_register(register: &Register) -> String {
    let body = match &register.instruction {
        Instruction::Input(kind) => kind.to_string(),
        Instruction::Apply { function, operands } => {
            let mut body = function.name();
            for &p in operands {
                body.push(' ');
                body.push(register_name(p));
            }
            body
        }
    };
    format!("{} <- {}", register.name(), body)
}

impl Program {
    /// Canonical line form.
    pub fn source_lines(&self) -> String {
        self.registers
            .iter()
            .map(render_register)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Single-line form, registers separated by ` | `.
    pub fn pipe_form(&self) -> String {
        self.registers
            .iter()
            .map(render_register)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source_lines())
    }
}

#[cfg(test)]
mod tests {
    use crate::compile::{compile, pipe_to_lines, CompileOptions};
    use linq_lang::Catalog;

    #[test]
    fn canonical_form_adds_prefixes() {
        let catalog = Catalog::new(512);
        let program = compile("[int]\nint\nTAKE b a", &catalog, &CompileOptions::unbounded()).unwrap();
        assert_eq!(program.source_lines(), "a <- [int]\nb <- int\nc <- TAKE b a");
    }

    #[test]
    fn pipe_form_roundtrips() {
        let catalog = Catalog::new(512);
        let pipe = "a <- [int] | b <- MAP INC a | c <- ZIPWITH * a b | d <- SCANL1 MAX c";
        let program = compile(&pipe_to_lines(pipe), &catalog, &CompileOptions::unbounded()).unwrap();
        assert_eq!(program.pipe_form(), pipe);
        assert_eq!(program.to_string(), pipe_to_lines(pipe));
    }
}
