//! Read-only script commands: roles, count, cues, match.

use super::OutputFormat;
use std::path::Path;
use troupe::{
    RoleName, count_by_role, cue_lines, extract_roles, highlight_tokens, line_match_score,
    parse_script,
};
use tracing::instrument;

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Read a script file.
pub fn read_script(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e).into())
}

/// Print each role on its own line.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn list_roles(file: &Path) -> CliResult {
    let text = read_script(file)?;
    for role in extract_roles(&text).iter() {
        println!("{}", role);
    }
    Ok(())
}

/// Print dialogue line counts in role order.
#[instrument(skip_all, fields(file = %file.display()))]
pub fn count_lines(file: &Path, format: &OutputFormat) -> CliResult {
    let text = read_script(file)?;
    let roles = extract_roles(&text);
    let counts = count_by_role(&text);

    match format {
        OutputFormat::Human => {
            for role in roles.iter() {
                println!("{}: {}", role, counts.get(role).copied().unwrap_or(0));
            }
        }
        OutputFormat::Json => {
            let ordered: Vec<serde_json::Value> = roles
                .iter()
                .map(|role| {
                    serde_json::json!({
                        "role": role,
                        "lines": counts.get(role).copied().unwrap_or(0),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&ordered)?);
        }
    }
    Ok(())
}

/// Print cue cards for one role.
#[instrument(skip_all, fields(file = %file.display(), role = %role))]
pub fn print_cues(file: &Path, role: &str) -> CliResult {
    let text = read_script(file)?;
    let role = RoleName::new(role);
    if !extract_roles(&text).contains(&role) {
        return Err(format!("'{}' does not speak in {}", role, file.display()).into());
    }

    for (i, card) in cue_lines(&parse_script(&text), &role).iter().enumerate() {
        println!("[{}] {}", i + 1, card.cue.as_deref().unwrap_or("(opening line)"));
        println!("    {}: {}", role, card.utterance);
    }
    Ok(())
}

/// Print the match score and the expected line with missed tokens bracketed.
pub fn match_line(expected: &str, spoken: &str) -> CliResult {
    let score = line_match_score(expected, spoken);
    let marked: Vec<String> = highlight_tokens(expected, spoken)
        .into_iter()
        .map(|t| {
            if t.matched {
                t.token
            } else {
                format!("[{}]", t.token)
            }
        })
        .collect();
    println!("score: {:.2}", score);
    println!("{}", marked.join(" "));
    Ok(())
}
