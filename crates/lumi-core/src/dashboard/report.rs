use chrono::NaiveDate;

use super::exercise::{ExerciseOutcome, EXERCISE_QUESTION};
use crate::utils::{capitalize_first, format_date};

/// Identifier used for the report when nobody is signed in
const DEFAULT_REPORT_IDENTIFIER: &str = "aluno@escola.pt";

/// Subject scores shown on the report and the progress tab
pub const SUBJECT_PROGRESS: [(&str, u16); 3] = [
    ("Matemática", 72),
    ("Português", 85),
    ("História", 63),
];

pub const PROJECTS: [&str; 2] = ["Sustentabilidade", "Robótica"];

/// Display name from an identifier: local part, first letter uppercased
pub fn display_name(identifier: Option<&str>) -> String {
    let identifier = identifier.unwrap_or(DEFAULT_REPORT_IDENTIFIER);
    let local = identifier.split('@').next().unwrap_or(identifier);
    capitalize_first(local)
}

/// The daily report text block
pub fn daily_report(
    identifier: Option<&str>,
    date: NaiveDate,
    last_exercise: Option<ExerciseOutcome>,
) -> String {
    let progress: String = SUBJECT_PROGRESS
        .iter()
        .map(|(subject, pct)| format!("- {}: {}%\n", subject, pct))
        .collect();
    let exercise = last_exercise.map_or("pendente", |o| o.feedback());

    format!(
        "=== Relatório Diário ===\n\
         Aluno: {}\n\
         Data: {}\n\
         \n\
         Progresso:\n\
         {}\
         \n\
         Último exercício: Matemática ({}) — {}\n\
         Projetos: {}\n",
        display_name(identifier),
        format_date(date),
        progress,
        EXERCISE_QUESTION,
        exercise,
        PROJECTS.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(Some("aluno@escola.pt")), "Aluno");
        assert_eq!(display_name(Some("ee@escola.pt")), "Ee");
        assert_eq!(display_name(None), "Aluno");
    }

    #[test]
    fn test_report_pending_exercise() {
        let expected = "=== Relatório Diário ===\n\
                        Aluno: Professor\n\
                        Data: 18/10/2026\n\
                        \n\
                        Progresso:\n\
                        - Matemática: 72%\n\
                        - Português: 85%\n\
                        - História: 63%\n\
                        \n\
                        Último exercício: Matemática (12 × (3 + 2)) — pendente\n\
                        Projetos: Sustentabilidade, Robótica\n";
        assert_eq!(daily_report(Some("professor@escola.pt"), date(), None), expected);
    }

    #[test]
    fn test_report_includes_exercise_feedback() {
        let report = daily_report(None, date(), Some(ExerciseOutcome::Correct));
        assert!(report.contains("Aluno: Aluno\n"));
        assert!(report.contains("— ✅ Correto! Boa!\n"));

        let report = daily_report(None, date(), Some(ExerciseOutcome::Wrong));
        assert!(report.contains("— ❌ Errado. Tenta outra vez.\n"));
    }
}
