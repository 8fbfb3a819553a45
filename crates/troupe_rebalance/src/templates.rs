//! Context-triggered line templates for fallback repair.

use serde::{Deserialize, Serialize};
use troupe_core::{Orthography, RoleName, is_wrapped_direction};

/// What in the anchor's context fires a template rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "when", rename_all = "snake_case")]
pub enum Trigger {
    /// The anchor ends with a question mark
    Question,
    /// The anchor ends with an exclamation mark
    Exclamation,
    /// Any of these words appears in the context window (case-insensitive)
    Keywords {
        /// Words or stems to look for
        words: Vec<String>,
    },
}

impl Trigger {
    fn fires(&self, anchor: &str, context: &str) -> bool {
        let anchor = anchor.trim_end();
        match self {
            Trigger::Question => anchor.ends_with('?') || anchor.ends_with('？'),
            Trigger::Exclamation => anchor.ends_with('!') || anchor.ends_with('！'),
            Trigger::Keywords { words } => {
                let lowered = context.to_lowercase();
                words
                    .iter()
                    .any(|w| !w.is_empty() && lowered.contains(&w.to_lowercase()))
            }
        }
    }
}

/// Templates proposed when a trigger fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRule {
    /// What fires the rule
    #[serde(flatten)]
    pub trigger: Trigger,
    /// Candidate lines, tried in order
    pub templates: Vec<String>,
}

/// Lines fallback repair can synthesize without the generation service.
///
/// Templates may contain `{role}` (the speaking role) and `{addressee}` (the
/// nearest other speaker around the anchor). A template that needs an
/// addressee is skipped when there is none.
///
/// # Examples
///
/// ```
/// use troupe_core::{Orthography, RoleName};
/// use troupe_rebalance::TemplateBook;
///
/// let book = TemplateBook::builtin(Orthography::Latin);
/// let mina = RoleName::new("Mina");
/// let candidates = book.candidates("Where did the puppy go?", "", &mina, None);
/// assert!(!candidates.is_empty());
/// assert!(candidates.iter().all(|c| !c.contains('{')));
/// assert!(book.opener(&mina).contains("Mina"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBook {
    /// First line for a role that has none
    pub opener: String,
    /// Last-resort line when nothing else is accepted
    pub safe_line: String,
    /// Stage direction bridging two non-dialogue neighbours
    pub connective: String,
    /// Context-triggered rules, in priority order
    #[serde(default)]
    pub rules: Vec<TemplateRule>,
    /// Continuations used when no rule fires, and after every fired rule
    #[serde(default)]
    pub default: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TemplateBook {
    /// Built-in book for a writing system; unknown scripts use English.
    pub fn builtin(orthography: Orthography) -> Self {
        match orthography {
            Orthography::Hangul => Self::korean(),
            Orthography::Latin | Orthography::Unknown => Self::english(),
        }
    }

    fn english() -> Self {
        Self {
            opener: "Hello, everyone! It's me, {role}.".to_string(),
            safe_line: "Let's keep going together.".to_string(),
            connective: "(a brief pause)".to_string(),
            rules: vec![
                TemplateRule {
                    trigger: Trigger::Question,
                    templates: strings(&[
                        "That's a good question. Let me think about it.",
                        "I think I know the answer to that, {addressee}.",
                    ]),
                },
                TemplateRule {
                    trigger: Trigger::Keywords {
                        words: strings(&[
                            "worried", "worry", "scared", "afraid", "nervous", "anxious",
                            "frightened",
                        ]),
                    },
                    templates: strings(&[
                        "Don't worry, {addressee}. We'll figure it out together.",
                        "It's going to be okay. I'm right here with you.",
                    ]),
                },
                TemplateRule {
                    trigger: Trigger::Exclamation,
                    templates: strings(&[
                        "Wow, I can hardly believe it!",
                        "That's amazing, {addressee}!",
                    ]),
                },
                TemplateRule {
                    trigger: Trigger::Keywords {
                        words: strings(&["thank", "grateful", "appreciate"]),
                    },
                    templates: strings(&[
                        "You're welcome. I'm glad I could help.",
                        "Anytime, {addressee}. That's what friends are for.",
                    ]),
                },
            ],
            default: strings(&[
                "I see what you mean, {addressee}.",
                "Then let's see what happens next.",
                "I have an idea about what we should do now.",
            ]),
        }
    }

    fn korean() -> Self {
        Self {
            opener: "안녕하세요, 여러분! 저 {role}도 왔어요.".to_string(),
            safe_line: "우리 계속 함께 해 봐요.".to_string(),
            connective: "(잠시 정적)".to_string(),
            rules: vec![
                TemplateRule {
                    trigger: Trigger::Question,
                    templates: strings(&[
                        "좋은 질문이에요. 잠깐 생각해 볼게요.",
                        "{addressee}, 내가 답을 알 것 같아.",
                    ]),
                },
                TemplateRule {
                    trigger: Trigger::Keywords {
                        words: strings(&["걱정", "무서", "불안", "떨려", "두려"]),
                    },
                    templates: strings(&[
                        "걱정하지 마, {addressee}. 우리가 같이 해결할 수 있어.",
                        "괜찮을 거야. 내가 옆에 있을게.",
                    ]),
                },
                TemplateRule {
                    trigger: Trigger::Exclamation,
                    templates: strings(&["우와, 정말 믿을 수가 없어!", "{addressee}, 정말 멋지다!"]),
                },
                TemplateRule {
                    trigger: Trigger::Keywords {
                        words: strings(&["고마", "감사"]),
                    },
                    templates: strings(&[
                        "천만에요. 도움이 되어서 기뻐요.",
                        "{addressee}, 언제든지 말해. 친구잖아.",
                    ]),
                },
            ],
            default: strings(&[
                "{addressee}, 무슨 말인지 알 것 같아.",
                "그럼 다음에 무슨 일이 생기는지 보자.",
                "이제 우리가 뭘 해야 할지 좋은 생각이 났어.",
            ]),
        }
    }

    /// The opener for `role`.
    pub fn opener(&self, role: &RoleName) -> String {
        self.opener.replace("{role}", role.as_str())
    }

    /// The safe line for `role`.
    pub fn safe_line(&self, role: &RoleName) -> String {
        self.safe_line.replace("{role}", role.as_str())
    }

    /// Candidate follow-ups for `anchor`, fired rules first, then defaults.
    pub fn candidates(
        &self,
        anchor: &str,
        context: &str,
        role: &RoleName,
        addressee: Option<&RoleName>,
    ) -> Vec<String> {
        let combined = format!("{}\n{}", anchor, context);
        let fired = self
            .rules
            .iter()
            .filter(|rule| rule.trigger.fires(anchor, &combined))
            .flat_map(|rule| rule.templates.iter());

        let mut out: Vec<String> = Vec::new();
        for template in fired.chain(self.default.iter()) {
            let Some(line) = fill(template, role, addressee) else {
                continue;
            };
            if !out.contains(&line) {
                out.push(line);
            }
        }
        out
    }

    /// Connective line, punctuated as a stage direction.
    pub fn connective_line(&self) -> String {
        let trimmed = self.connective.trim();
        if is_wrapped_direction(trimmed) {
            trimmed.to_string()
        } else {
            format!("({})", trimmed)
        }
    }
}

fn fill(template: &str, role: &RoleName, addressee: Option<&RoleName>) -> Option<String> {
    let with_role = template.replace("{role}", role.as_str());
    if with_role.contains("{addressee}") {
        let addressee = addressee?;
        Some(with_role.replace("{addressee}", addressee.as_str()))
    } else {
        Some(with_role)
    }
}
