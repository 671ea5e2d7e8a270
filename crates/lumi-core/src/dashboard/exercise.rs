/// The exercise of the day
pub const EXERCISE_QUESTION: &str = "12 × (3 + 2)";

const EXPECTED_ANSWER: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseOutcome {
    Correct,
    Wrong,
}

impl ExerciseOutcome {
    pub fn feedback(&self) -> &'static str {
        match self {
            ExerciseOutcome::Correct => "✅ Correto! Boa!",
            ExerciseOutcome::Wrong => "❌ Errado. Tenta outra vez.",
        }
    }
}

/// Integer at the start of `input`: leading whitespace, an optional sign,
/// then digits. Anything after the digits is ignored ("60 pontos" -> 60).
pub fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

pub fn check_answer(input: &str) -> ExerciseOutcome {
    if parse_leading_int(input) == Some(EXPECTED_ANSWER) {
        ExerciseOutcome::Correct
    } else {
        ExerciseOutcome::Wrong
    }
}
