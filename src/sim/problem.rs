//! Math problem and answer generation
//!
//! Every function takes the RNG as a parameter so callers (and tests) decide
//! the seed.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::config::Operation;

/// Distractors land within this distance of the correct answer
pub const DISTRACTOR_SPREAD: i32 = 5;
/// Rejection-sampling budget before falling back to a deterministic fill
pub const MAX_DISTRACTOR_ATTEMPTS: u32 = 100;

/// A single question, e.g. `7 × 8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathProblem {
    pub operand_a: i32,
    pub operand_b: i32,
    pub operation: Operation,
    pub correct_answer: i32,
}

impl MathProblem {
    /// Build a problem, computing its answer. Division expects `operand_b != 0`.
    pub fn new(operand_a: i32, operand_b: i32, operation: Operation) -> Self {
        Self {
            operand_a,
            operand_b,
            operation,
            correct_answer: operation.apply(operand_a, operand_b),
        }
    }

    /// Question text without the answer
    pub fn display(&self) -> String {
        format!(
            "{} {} {} = ?",
            self.operand_a,
            self.operation.symbol(),
            self.operand_b
        )
    }
}

/// Generate a problem for `operation`, optionally pinning one operand.
///
/// Add/multiply pin the first operand, subtraction pins the subtrahend (then
/// orders the pair so the result is non-negative), division pins the divisor.
pub fn generate<R: Rng + ?Sized>(
    operation: Operation,
    fixed_operand: Option<i32>,
    rng: &mut R,
) -> MathProblem {
    let max = operation.max_operand();

    match operation {
        Operation::Add | Operation::Multiply => {
            let a = fixed_operand.unwrap_or_else(|| rng.random_range(0..=max));
            let b = rng.random_range(0..=max);
            MathProblem::new(a, b, operation)
        }
        Operation::Subtract => {
            let mut a = rng.random_range(0..=max);
            let mut b = fixed_operand.unwrap_or_else(|| rng.random_range(0..=max));
            if a < b {
                std::mem::swap(&mut a, &mut b);
            }
            MathProblem::new(a, b, operation)
        }
        Operation::Divide => {
            // Build the dividend from divisor × quotient so there is never a remainder
            let divisor = fixed_operand
                .unwrap_or_else(|| rng.random_range(1..=max))
                .max(1);
            let quotient = rng.random_range(0..=max);
            MathProblem::new(divisor * quotient, divisor, operation)
        }
    }
}

/// Produce `count` wrong answers near `correct_answer`.
///
/// Values are pairwise distinct, never equal to the correct answer and never
/// negative. Sampling is bounded; if it runs out of attempts the remainder is
/// filled with the next unused values above the answer.
pub fn generate_distractors<R: Rng + ?Sized>(
    correct_answer: i32,
    count: usize,
    rng: &mut R,
) -> Vec<i32> {
    let mut distractors = Vec::with_capacity(count);
    let mut attempts = 0;

    while distractors.len() < count && attempts < MAX_DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let offset = rng.random_range(-DISTRACTOR_SPREAD..=DISTRACTOR_SPREAD);
        let value = correct_answer + offset;
        if offset == 0 || value < 0 || distractors.contains(&value) {
            continue;
        }
        distractors.push(value);
    }

    let mut next = correct_answer.max(0) + 1;
    while distractors.len() < count {
        if !distractors.contains(&next) {
            distractors.push(next);
        }
        next += 1;
    }

    distractors
}

/// Correct answer plus distractors in uniformly random order.
/// The flag is `true` for the correct answer.
pub fn shuffled_answers<R: Rng + ?Sized>(
    problem: &MathProblem,
    count: usize,
    rng: &mut R,
) -> Vec<(i32, bool)> {
    let mut answers = Vec::with_capacity(count);
    answers.push((problem.correct_answer, true));
    answers.extend(
        generate_distractors(problem.correct_answer, count.saturating_sub(1), rng)
            .into_iter()
            .map(|value| (value, false)),
    );
    // Fisher-Yates
    answers.shuffle(rng);
    answers
}
