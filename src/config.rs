//! Game configuration chosen on the menu
//!
//! A configuration is fixed for the whole round and doubles as the
//! high-score key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Arithmetic operation practiced in a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "add" | "addition" | "+" => Some(Operation::Add),
            "subtract" | "subtraction" | "sub" | "-" => Some(Operation::Subtract),
            "multiply" | "multiplication" | "mul" | "x" | "*" => Some(Operation::Multiply),
            "divide" | "division" | "div" | "/" => Some(Operation::Divide),
            _ => None,
        }
    }

    /// Symbol shown between the operands
    pub fn symbol(&self) -> char {
        match self {
            Operation::Add => '+',
            Operation::Subtract => '-',
            Operation::Multiply => '×',
            Operation::Divide => '÷',
        }
    }

    /// Largest operand drawn for this operation (ranges start at 0)
    pub fn max_operand(&self) -> i32 {
        match self {
            Operation::Add | Operation::Subtract => 10,
            Operation::Multiply | Operation::Divide => 12,
        }
    }

    /// Inclusive range a pinned operand must fall in.
    /// Division pins the divisor, so zero is excluded.
    pub fn fixed_operand_range(&self) -> (i32, i32) {
        match self {
            Operation::Divide => (1, self.max_operand()),
            _ => (0, self.max_operand()),
        }
    }

    /// Apply the operation. Division is integer division and expects a non-zero divisor.
    pub fn apply(&self, a: i32, b: i32) -> i32 {
        match self {
            Operation::Add => a + b,
            Operation::Subtract => a - b,
            Operation::Multiply => a * b,
            Operation::Divide => a / b,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether every operand is drawn at random or one is pinned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PracticeMode {
    #[default]
    All,
    Specific,
}

impl PracticeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeMode::All => "all",
            PracticeMode::Specific => "specific",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(PracticeMode::All),
            "specific" => Some(PracticeMode::Specific),
            _ => None,
        }
    }
}

/// Round length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoundDuration {
    Thirty,
    #[default]
    Sixty,
    Ninety,
}

impl RoundDuration {
    pub const ALL: [RoundDuration; 3] = [
        RoundDuration::Thirty,
        RoundDuration::Sixty,
        RoundDuration::Ninety,
    ];

    pub fn seconds(&self) -> u32 {
        match self {
            RoundDuration::Thirty => 30,
            RoundDuration::Sixty => 60,
            RoundDuration::Ninety => 90,
        }
    }

    pub fn from_seconds(secs: u32) -> Option<Self> {
        match secs {
            30 => Some(RoundDuration::Thirty),
            60 => Some(RoundDuration::Sixty),
            90 => Some(RoundDuration::Ninety),
            _ => None,
        }
    }
}

/// Reasons a configuration is refused before a round starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Specific mode was chosen without a number to practice
    MissingFixedOperand,
    /// A fixed operand was supplied in `All` mode
    UnexpectedFixedOperand,
    FixedOperandOutOfRange {
        operation: Operation,
        value: i32,
        min: i32,
        max: i32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingFixedOperand => {
                write!(f, "specific practice mode needs a fixed operand")
            }
            ConfigError::UnexpectedFixedOperand => {
                write!(f, "a fixed operand is only allowed in specific practice mode")
            }
            ConfigError::FixedOperandOutOfRange {
                operation,
                value,
                min,
                max,
            } => write!(
                f,
                "fixed operand {value} is outside {min}..={max} for {operation}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Everything the player picks before a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfiguration {
    pub operation: Operation,
    pub mode: PracticeMode,
    /// Pinned operand; present iff `mode` is `Specific`
    pub fixed_operand: Option<i32>,
    pub duration: RoundDuration,
}

impl GameConfiguration {
    /// Build a validated configuration
    pub fn new(
        operation: Operation,
        mode: PracticeMode,
        fixed_operand: Option<i32>,
        duration: RoundDuration,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            operation,
            mode,
            fixed_operand,
            duration,
        };
        config.validate()?;
        Ok(config)
    }

    /// Practice every number of `operation`
    pub fn all(operation: Operation, duration: RoundDuration) -> Self {
        Self {
            operation,
            mode: PracticeMode::All,
            fixed_operand: None,
            duration,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match (self.mode, self.fixed_operand) {
            (PracticeMode::All, None) => Ok(()),
            (PracticeMode::All, Some(_)) => Err(ConfigError::UnexpectedFixedOperand),
            (PracticeMode::Specific, None) => Err(ConfigError::MissingFixedOperand),
            (PracticeMode::Specific, Some(value)) => {
                let (min, max) = self.operation.fixed_operand_range();
                if (min..=max).contains(&value) {
                    Ok(())
                } else {
                    Err(ConfigError::FixedOperandOutOfRange {
                        operation: self.operation,
                        value,
                        min,
                        max,
                    })
                }
            }
        }
    }

    pub fn duration_seconds(&self) -> f32 {
        self.duration.seconds() as f32
    }

    /// Composite key for the best-score table
    pub fn score_key(&self) -> String {
        match self.fixed_operand {
            Some(n) => format!(
                "quiz_blaster_best_{}_{}_{}_{}",
                self.operation.as_str(),
                self.mode.as_str(),
                n,
                self.duration.seconds()
            ),
            None => format!(
                "quiz_blaster_best_{}_{}_{}",
                self.operation.as_str(),
                self.mode.as_str(),
                self.duration.seconds()
            ),
        }
    }
}
