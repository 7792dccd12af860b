//! Intermediate representation for compiled programs.

use linq_lang::{Function, Interval, Kind};

/// How a register gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// A program input of the given kind.
    Input(Kind),
    /// A function applied to earlier registers.
    Apply {
        function: Function,
        /// Operand register indices, each strictly below the defining register.
        operands: Vec<usize>,
    },
}

/// A single-assignment register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register {
    /// Position in the program (`a` = 0).
    pub index: usize,
    /// Inferred kind.
    pub kind: Kind,
    pub instruction: Instruction,
}

impl Register {
    pub fn is_input(&self) -> bool {
        matches!(self.instruction, Instruction::Input(_))
    }

    /// Source letter naming this register.
    pub fn name(&self) -> char {
        register_name(self.index)
    }

    pub fn function(&self) -> Option<Function> {
        match &self.instruction {
            Instruction::Input(_) => None,
            Instruction::Apply { function, .. } => Some(*function),
        }
    }

    pub fn operands(&self) -> &[usize] {
        match &self.instruction {
            Instruction::Input(_) => &[],
            Instruction::Apply { operands, .. } => operands,
        }
    }
}

/// Letter naming register `index` (`0 -> 'a'`).
pub fn register_name(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map_or('?', |i| (b'a' + i) as char)
}

/// Register index named by a source letter.
pub fn register_index(name: char) -> Option<usize> {
    name.is_ascii_lowercase()
        .then(|| (name as u8 - b'a') as usize)
}

/// A compiled program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Source text as given to the compiler.
    pub source: String,
    /// Registers in definition order; inputs come first.
    pub registers: Vec<Register>,
    /// Value bound `V` the program was compiled against. Also the null value.
    pub value_bound: i64,
    /// List length bounds were computed for, if any.
    pub list_len: Option<usize>,
    /// Legal interval per input register. `None` when no list length was given.
    pub input_bounds: Option<Vec<Interval>>,
    /// Final candidate interval of every register after propagation.
    pub register_bounds: Option<Vec<Interval>>,
}

impl Program {
    pub fn num_inputs(&self) -> usize {
        self.registers.iter().take_while(|r| r.is_input()).count()
    }

    pub fn input_kinds(&self) -> Vec<Kind> {
        self.registers
            .iter()
            .take_while(|r| r.is_input())
            .map(|r| r.kind)
            .collect()
    }

    /// Kind of the last register.
    pub fn output_kind(&self) -> Kind {
        self.registers.last().map_or(Kind::Int, |r| r.kind)
    }

    /// Registers that apply a function.
    pub fn instructions(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter().filter(|r| !r.is_input())
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}
