use crate::events::{Outcome, Phase, ResultEvent};
use crate::render::theme::{paint, Glyph, Role, Theme};

/// Canonical status buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusCategory {
    Passed,
    Failed,
    Error,
    Skipped,
    Xfailed,
    Xpassed,
    Rerun,
    Deselected,
    Unknown,
}

impl StatusCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusCategory::Passed => "passed",
            StatusCategory::Failed => "failed",
            StatusCategory::Error => "error",
            StatusCategory::Skipped => "skipped",
            StatusCategory::Xfailed => "xfailed",
            StatusCategory::Xpassed => "xpassed",
            StatusCategory::Rerun => "rerun",
            StatusCategory::Deselected => "deselected",
            StatusCategory::Unknown => "unknown",
        }
    }
}

/// How one phase result is counted and drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub category: StatusCategory,
    pub glyph: Glyph,
    pub role: Role,
    /// Upper-case word used by verbose and plain output.
    pub label: &'static str,
    /// The result makes the whole run fail.
    pub fails_run: bool,
}

impl Classification {
    /// The glyph in its theme color.
    pub fn styled_glyph(&self, theme: &Theme) -> String {
        let (glyph, color) = theme.resolve(self.glyph, self.role);
        paint(&glyph, color, None)
    }
}

/// Map one phase result onto a category. Pure: depends only on its inputs.
pub fn classify(outcome: Outcome, xfail: bool, strict: bool, phase: Phase) -> Classification {
    if xfail {
        match outcome {
            Outcome::Skipped => {
                return Classification {
                    category: StatusCategory::Xfailed,
                    glyph: Glyph::XfailedSkipped,
                    role: Role::Xfailed,
                    label: "xfail",
                    fails_run: false,
                }
            }
            Outcome::Passed => {
                // A stale expectation: drawn with the failure glyph family.
                return Classification {
                    category: StatusCategory::Xpassed,
                    glyph: Glyph::XfailedFailed,
                    role: Role::Xpassed,
                    label: "XPASS",
                    fails_run: strict,
                };
            }
            _ => {}
        }
    }

    match outcome {
        Outcome::Passed => Classification {
            category: StatusCategory::Passed,
            glyph: Glyph::Passed,
            role: Role::Success,
            label: "PASSED",
            fails_run: false,
        },
        Outcome::Skipped => Classification {
            category: StatusCategory::Skipped,
            glyph: Glyph::Skipped,
            role: Role::Skipped,
            label: "SKIPPED",
            fails_run: false,
        },
        Outcome::Failed => Classification {
            category: StatusCategory::Failed,
            glyph: if phase == Phase::Call {
                Glyph::Failed
            } else {
                Glyph::FailedNotCall
            },
            role: Role::Fail,
            label: if phase == Phase::Call { "FAILED" } else { "ERROR" },
            fails_run: true,
        },
        Outcome::Rerun => Classification {
            category: StatusCategory::Rerun,
            glyph: Glyph::Rerun,
            role: Role::Rerun,
            label: "RERUN",
            fails_run: false,
        },
        Outcome::Unknown => Classification {
            category: StatusCategory::Unknown,
            glyph: Glyph::Unknown,
            role: Role::Unknown,
            label: "UNKNOWN",
            fails_run: false,
        },
    }
}

pub fn classify_event(event: &ResultEvent) -> Classification {
    classify(event.outcome, event.xfail, event.strict, event.when)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_outcomes() {
        assert_eq!(
            classify(Outcome::Passed, false, false, Phase::Call).category,
            StatusCategory::Passed
        );
        assert_eq!(
            classify(Outcome::Skipped, false, false, Phase::Setup).category,
            StatusCategory::Skipped
        );
        assert_eq!(
            classify(Outcome::Rerun, false, false, Phase::Call).category,
            StatusCategory::Rerun
        );
        assert_eq!(
            classify(Outcome::Unknown, false, false, Phase::Call).glyph,
            Glyph::Unknown
        );
    }

    #[test]
    fn test_failure_outside_call_uses_distinct_glyph() {
        let call = classify(Outcome::Failed, false, false, Phase::Call);
        let teardown = classify(Outcome::Failed, false, false, Phase::Teardown);
        assert_eq!(call.category, StatusCategory::Failed);
        assert_eq!(teardown.category, StatusCategory::Failed);
        assert_eq!(call.glyph, Glyph::Failed);
        assert_eq!(teardown.glyph, Glyph::FailedNotCall);
        assert_eq!(teardown.label, "ERROR");
        assert!(call.fails_run && teardown.fails_run);
    }

    #[test]
    fn test_expected_failure_that_failed_is_xfailed() {
        let c = classify(Outcome::Skipped, true, false, Phase::Call);
        assert_eq!(c.category, StatusCategory::Xfailed);
        assert_eq!(c.glyph, Glyph::XfailedSkipped);
        assert!(!c.fails_run);
    }

    #[test]
    fn test_unexpected_pass_uses_failure_glyph_family() {
        let c = classify(Outcome::Passed, true, false, Phase::Call);
        assert_eq!(c.category, StatusCategory::Xpassed);
        assert_eq!(c.glyph, Glyph::XfailedFailed);
        assert_eq!(c.role, Role::Xpassed);
        assert!(!c.fails_run);
    }

    #[test]
    fn test_strict_unexpected_pass_fails_the_run() {
        let c = classify(Outcome::Passed, true, true, Phase::Call);
        assert_eq!(c.category, StatusCategory::Xpassed);
        assert!(c.fails_run);
    }

    #[test]
    fn test_styled_glyph_plain() {
        colored::control::set_override(false);
        let c = classify(Outcome::Passed, false, false, Phase::Call);
        assert_eq!(c.styled_glyph(&Theme::default()), "✓");
    }

    fn outcome() -> impl Strategy<Value = Outcome> {
        prop_oneof![
            Just(Outcome::Passed),
            Just(Outcome::Failed),
            Just(Outcome::Skipped),
            Just(Outcome::Rerun),
            Just(Outcome::Unknown),
        ]
    }

    fn phase() -> impl Strategy<Value = Phase> {
        prop_oneof![
            Just(Phase::Setup),
            Just(Phase::Call),
            Just(Phase::Teardown),
            Just(Phase::Collect),
        ]
    }

    proptest! {
        #[test]
        fn prop_classify_is_deterministic(
            o in outcome(), xfail in any::<bool>(), strict in any::<bool>(), p in phase()
        ) {
            prop_assert_eq!(classify(o, xfail, strict, p), classify(o, xfail, strict, p));
        }

        #[test]
        fn prop_strict_only_matters_for_unexpected_pass(
            o in outcome(), xfail in any::<bool>(), p in phase()
        ) {
            let lax = classify(o, xfail, false, p);
            let strict = classify(o, xfail, true, p);
            prop_assert_eq!(lax.category, strict.category);
            if !(xfail && o == Outcome::Passed) {
                prop_assert_eq!(lax, strict);
            }
        }
    }
}
