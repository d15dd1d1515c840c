// Text rendering of the summary, for reading in a terminal.
use crate::digest::*;

const NO_TOTAL: &str = "Aucun total disponible pour calculer les pourcentages sur cet item.";
const NO_MODALITIES: &str = "Aucune modalité fermée pour cet item (uniquement des commentaires).";
const NO_COMMENT: &str = "Aucun commentaire renseigné pour cet item.";
const NO_RESPONSE: &str = "Aucune réponse renseignée pour cette question.";

fn session_header(session: &SessionInfo) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(n) = &session.number {
        parts.push(format!("Session {}", n));
    }
    if let Some(d) = &session.date {
        parts.push(format!("du {}", d));
    }
    if let Some(l) = &session.label {
        parts.push(format!("({})", l));
    }
    parts.join(" ")
}

fn render_distribution(d: &Distribution) -> Vec<String> {
    match d {
        Distribution::NoModalities => vec![format!("  {}", NO_MODALITIES)],
        Distribution::NoTotal => vec![format!("  {}", NO_TOTAL)],
        Distribution::Counts { total, modalities } => {
            let mut lines = vec![format!("  {} réponses", total)];
            lines.extend(modalities.iter().map(|m| {
                format!(
                    "  - {} : {} réponses ({:.1}%)",
                    m.label, m.count, m.percentage
                )
            }));
            lines
        }
    }
}

fn render_item(item: &ItemReport) -> Vec<String> {
    let mut lines = vec![format!("## {}", item.label)];
    lines.extend(render_distribution(&item.distribution));
    if item.has_comment_columns {
        if item.comments.is_empty() {
            lines.push(format!("  {}", NO_COMMENT));
        }
        for (i, c) in item.comments.iter().enumerate() {
            lines.push(format!("  Commentaire {} : {}", i + 1, c));
        }
    }
    lines.push(String::new());
    lines
}

fn render_open_question(q: &OpenQuestionReport) -> Vec<String> {
    let mut lines = vec![format!(
        "## {} (colonne {})",
        q.label,
        io_common::column_index_to_letters(q.column)
    )];
    if q.responses.is_empty() {
        lines.push(format!("  {}", NO_RESPONSE));
    }
    for (i, r) in q.responses.iter().enumerate() {
        lines.push(format!("  Réponse {} : {}", i + 1, r));
    }
    lines.push(String::new());
    lines
}

/// Renders the report as plain text, with the messages shown to the trainers.
pub fn render_text(session: &SessionInfo, report: &SurveyReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    if !session.is_empty() {
        lines.push(format!("# {}", session_header(session)));
        lines.push(String::new());
    }
    lines.push(format!(
        "{} lignes, {} colonnes d'items",
        report.num_rows, report.num_item_columns
    ));
    lines.push(String::new());
    for item in report.items.iter() {
        lines.extend(render_item(item));
    }

    if !report.open_questions.is_empty() {
        lines.push("# Questions ouvertes finales".to_string());
        lines.push(String::new());
        for q in report.open_questions.iter() {
            lines.extend(render_open_question(q));
        }
    }

    if !report.warnings.is_empty() {
        lines.push("# Avertissements".to_string());
        lines.push(String::new());
        lines.extend(report.warnings.iter().map(|w| format!("  - {}", w)));
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(label: &str, distribution: Distribution, comments: &[&str]) -> ItemReport {
        ItemReport {
            label: label.to_string(),
            distribution,
            has_comment_columns: true,
            comments: comments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn counts_and_comments() {
        let report = SurveyReport {
            items: vec![item(
                "Accueil",
                Distribution::Counts {
                    total: 3,
                    modalities: vec![
                        ModalityCount {
                            label: "Très satisfait".to_string(),
                            count: 2,
                            percentage: 66.7,
                            color: "#1b7837".to_string(),
                        },
                        ModalityCount {
                            label: "Satisfait".to_string(),
                            count: 1,
                            percentage: 33.3,
                            color: "#5aae61".to_string(),
                        },
                    ],
                },
                &["Très bon accueil"],
            )],
            open_questions: vec![],
            num_rows: 4,
            num_item_columns: 3,
            warnings: vec![],
        };
        let txt = render_text(&SessionInfo::default(), &report);
        assert!(txt.contains("## Accueil\n  3 réponses\n"));
        assert!(txt.contains("  - Très satisfait : 2 réponses (66.7%)\n"));
        assert!(txt.contains("  Commentaire 1 : Très bon accueil\n"));
        assert!(!txt.contains(NO_COMMENT));
        assert!(!txt.contains("Questions ouvertes"));
    }

    #[test]
    fn empty_states() {
        let report = SurveyReport {
            items: vec![
                item("Durée", Distribution::NoTotal, &[]),
                item("Supports", Distribution::NoModalities, &[]),
            ],
            open_questions: vec![OpenQuestionReport {
                column: 66,
                label: "Suggestions".to_string(),
                responses: vec![],
            }],
            num_rows: 2,
            num_item_columns: 3,
            warnings: vec!["open question column 68 is missing".to_string()],
        };
        let session = SessionInfo {
            number: Some("17".to_string()),
            date: Some("2024-03-12".to_string()),
            label: None,
        };
        let txt = render_text(&session, &report);
        assert!(txt.starts_with("# Session 17 du 2024-03-12\n"));
        assert!(txt.contains(NO_TOTAL));
        assert!(txt.contains(NO_MODALITIES));
        assert_eq!(txt.matches(NO_COMMENT).count(), 2);
        assert!(txt.contains("## Suggestions (colonne BO)\n  Aucune réponse"));
        assert!(txt.contains("  - open question column 68 is missing\n"));
    }

    #[test]
    fn layout_of_the_text() {
        let report = SurveyReport {
            items: vec![item("Supports", Distribution::NoModalities, &["Clairs"])],
            open_questions: vec![],
            num_rows: 3,
            num_item_columns: 1,
            warnings: vec![],
        };
        let txt = render_text(&SessionInfo::default(), &report);
        assert_eq!(
            txt,
            "3 lignes, 1 colonnes d'items\n\n\
             ## Supports\n  \
             Aucune modalité fermée pour cet item (uniquement des commentaires).\n  \
             Commentaire 1 : Clairs\n\n"
        );
    }
}
