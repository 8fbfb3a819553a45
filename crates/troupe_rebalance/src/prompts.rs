//! Instructions sent to the generation service.

use troupe_core::{LineCounts, PracticeTurn, RoleName, RoleSet, Script, TargetSpec};

const EDITOR_ROLE: &str = "You are the script editor for a school play. \
Matching each character's target number of dialogue lines exactly is your top priority. \
Keep the story flowing naturally. \
Stage directions go in parentheses ( ) only and never count as dialogue lines. \
Use only the characters listed; never add new characters or change the spelling of names.";

const FORMAT_CONTRACT: &str = "Write every dialogue line as `Name: words` on its own line. \
Output the script text only, with no explanations, tables, headings or code fences.";

const DIRECTIVE_CONTRACT: &str = "Answer with directives only, one per line. \
Line numbers refer to the numbered script above. Output nothing else.";

/// Standing instructions for full rewrites.
pub fn rewrite_system() -> String {
    format!("{}\n{}", EDITOR_ROLE, FORMAT_CONTRACT)
}

/// Standing instructions for directive-based edits.
pub fn directive_system() -> String {
    format!("{}\n{}", EDITOR_ROLE, DIRECTIVE_CONTRACT)
}

fn target_lines(roles: &RoleSet, target: &TargetSpec) -> String {
    roles
        .iter()
        .filter_map(|role| target.get(role).map(|n| format!("- {}: {} lines", role, n)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `- Role: now N, target M` line per role that is off.
pub fn discrepancies(roles: &RoleSet, counts: &LineCounts, target: &TargetSpec) -> String {
    roles
        .iter()
        .filter_map(|role| {
            let want = target.get(role)?;
            let have = counts.get(role).copied().unwrap_or(0);
            (have != want).then(|| format!("- {}: now {} lines, target {} lines", role, have, want))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First request of a full rewrite.
pub fn rewrite_request(script: &Script, roles: &RoleSet, target: &TargetSpec) -> String {
    format!(
        "Original script:\n{script}\n\n\
         Characters: {roles}\n\n\
         Target dialogue lines:\n{targets}\n\n\
         Requirements:\n\
         1) Match every character's dialogue line count to the target exactly.\n\
         2) Stage directions in parentheses are free and are not counted.\n\
         3) Do not add characters. Keep every name spelled exactly as given.\n\
         4) Keep the beginning, middle and end of the story; trim needless repetition.\n\
         5) Let the characters answer and react to each other naturally.",
        script = script.render(),
        roles = roles.joined(),
        targets = target_lines(roles, target),
    )
}

/// Follow-up request after a draft missed the target.
pub fn rewrite_correction(previous: &Script, discrepancies: &str) -> String {
    format!(
        "Only fix the discrepancies below in the draft. Do not rewrite it arbitrarily; \
         add, remove, merge or split only the lines needed.\n\
         Discrepancies:\n{discrepancies}\n\n\
         Keep scenes and stage directions, and do not change any character or name.\n\n\
         Previous draft:\n{draft}",
        discrepancies = discrepancies,
        draft = previous.render(),
    )
}

fn amounts(items: &[(RoleName, usize)]) -> String {
    items
        .iter()
        .map(|(role, n)| format!("- {}: {}", role, n))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Request for insertion directives covering `deficits`.
pub fn additive_request(
    script: &Script,
    roles: &RoleSet,
    deficits: &[(RoleName, usize)],
    correction: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Numbered script:\n{numbered}\n\n\
         Characters: {roles}\n\n\
         Add exactly this many new dialogue lines per character:\n{deficits}\n\n\
         Use only this directive:\n\
         INSERT AFTER <line number>: <character>: <new line>\n\
         Use 0 to insert before the first line and END to insert after the last.\n\
         Never delete or change existing lines. Each new line should fit what comes before and after it.",
        numbered = script.numbered(),
        roles = roles.joined(),
        deficits = amounts(deficits),
    );
    if let Some(note) = correction {
        prompt.push_str("\n\nYour previous answer missed:\n");
        prompt.push_str(note);
    }
    prompt
}

/// Request for deletion directives covering `surpluses`.
pub fn subtractive_request(
    script: &Script,
    roles: &RoleSet,
    surpluses: &[(RoleName, usize)],
    ignored: &[(RoleName, usize)],
    max_connective_chars: usize,
    correction: Option<&str>,
) -> String {
    let mut prompt = format!(
        "Numbered script:\n{numbered}\n\n\
         Characters: {roles}\n\n\
         Remove exactly this many dialogue lines per character:\n{surpluses}\n\n\
         Use only these directives:\n\
         DELETE <line number>\n\
         INSERT AFTER <line number>: (<short stage direction>)\n\
         Stage directions must be in parentheses and at most {max} characters. \
         Only use them to smooth over a gap left by a deletion. \
         Never write new dialogue and never change existing lines.",
        numbered = script.numbered(),
        roles = roles.joined(),
        surpluses = amounts(surpluses),
        max = max_connective_chars,
    );
    if !ignored.is_empty() {
        prompt.push_str("\n\nDo not address these characters, they are handled elsewhere:\n");
        prompt.push_str(&amounts(ignored));
    }
    if let Some(note) = correction {
        prompt.push_str("\n\nYour previous answer missed:\n");
        prompt.push_str(note);
    }
    prompt
}

/// Request for a single in-context line for `role`.
pub fn single_line_request(role: &RoleName, anchor: &str, context: &str) -> String {
    format!(
        "Scene so far:\n{context}\n\n\
         Write one short new line for {role} that follows naturally after \"{anchor}\". \
         It must not repeat that line. \
         Answer with the line only, as `{role}: <words>`.",
        context = context,
        role = role,
        anchor = anchor,
    )
}

const COACH_ROLE: &str = "You are a drama coach helping elementary school students \
put on a play. Keep your language simple, warm and concrete.";

/// Standing instructions for the script workshop.
pub fn coach_system() -> String {
    COACH_ROLE.to_string()
}

/// Review against seven criteria.
pub fn feedback_request(script: &str) -> String {
    format!(
        "Review the script below against these seven criteria. \
         Keep examples brief and make every suggested fix specific.\n\
         1) Clarity of theme\n\
         2) Completeness of the story arc\n\
         3) Whether each character's voice fits their personality\n\
         4) Appropriate use of narration, dialogue and stage directions\n\
         5) Completeness of structure\n\
         6) Originality and fun\n\
         7) Spelling and spacing\n\n\
         Script:\n{script}"
    )
}

/// Polished, expanded performance draft.
pub fn final_draft_request(script: &str, roles: &RoleSet) -> String {
    format!(
        "Polish the script below for young performers, filling it out where needed \
         so the beginning, rising action, climax and ending are clear.\n\n\
         Format rules:\n\
         1) Split it into at least 4 scenes (5 to 7 is best), each headed `Scene 1`, \
         `Scene 2` and so on, on a line of its own.\n\
         2) Give every scene an opening, a turn and a resolution, with a short bridge \
         between scenes.\n\
         3) Write dialogue as `Name: words` and stage directions only in parentheses ( ). \
         Never use labels such as Narration, Scene or Stage as a character name.\n\
         4) Avoid repeating scenes and stay true to the theme.\n\
         5) Resolve the conflict in the last scene and leave a lasting impression.\n\
         6) Use only these characters: {roles}.\n\n\
         You may add scenes beyond the original.\n\n\
         Script:\n{script}",
        roles = roles.joined(),
    )
}

/// Props, stage and costume checklist.
pub fn stage_kit_request(script: &str) -> String {
    format!(
        "Make a props, set and costume checklist for a school production of the \
         script below. Use four markdown tables, Required, Optional, Substitutes and \
         Safety Notes, followed by a few short tips.\n\n\
         Script:\n{script}"
    )
}

/// Coaching notes for a rehearsal session.
pub fn session_feedback_request(turns: &[PracticeTurn]) -> String {
    let record = turns
        .iter()
        .enumerate()
        .map(|(i, turn)| {
            format!(
                "{n}. {role}\n   script: {expected}\n   heard: {spoken}\n   match: {score:.2}",
                n = i + 1,
                role = turn.role,
                expected = turn.expected,
                spoken = turn.spoken,
                score = turn.score,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "This is a record of a line rehearsal. Focusing on pace, tone and volume, \
         briefly write what went well, what to improve and a tip for next practice.\n\n\
         {record}"
    )
}
