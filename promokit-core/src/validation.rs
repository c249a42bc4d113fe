//! Validation System - Rule/Policy Separation
//!
//! Rules inspect the color assignments a job asks for and produce
//! structured violations. The failure mode decides what the violations mean:
//! `Block` rejects the job, `Repair` lets the deterministic repair fix
//! background collisions and keeps them as warnings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::colors::replacement_for;
use crate::palette::{options_excluding, RootColor, PALETTE};
use crate::templates::{ColorSlot, LogoPart, TemplateInfo, TemplateKey};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    #[default]
    Block,
    Repair,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub slot: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
    /// Fixable by the background-collision repair.
    #[serde(default)]
    pub repairable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
    pub template: TemplateKey,
    pub failure_mode: FailureMode,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    /// `rule(slot): message` for each error, joined.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}({}): {}", v.rule, v.slot, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Colors requested by a job. Unset entries keep the session's current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorAssignment {
    #[serde(default)]
    pub background: Option<RootColor>,
    #[serde(default)]
    pub cta: Option<RootColor>,
    #[serde(default)]
    pub title: Option<RootColor>,
    #[serde(default)]
    pub badges: BTreeMap<ColorSlot, RootColor>,
    #[serde(default)]
    pub logo: BTreeMap<LogoPart, RootColor>,
}

impl ColorAssignment {
    pub fn effective_background(&self, template: &TemplateInfo) -> RootColor {
        self.background.unwrap_or(template.default_background)
    }

    /// Template-scoped slot assignments, cta and title first.
    pub fn slots(&self) -> BTreeMap<ColorSlot, RootColor> {
        let mut slots = self.badges.clone();
        if let Some(c) = self.cta {
            slots.insert(ColorSlot::Cta, c);
        }
        if let Some(c) = self.title {
            slots.insert(ColorSlot::Title, c);
        }
        slots
    }

    /// Every dependent assignment (slots and logo words) with its label.
    pub fn dependents(&self) -> Vec<(String, RootColor)> {
        let mut out: Vec<(String, RootColor)> = self
            .slots()
            .into_iter()
            .map(|(slot, c)| (slot.to_string(), c))
            .collect();
        out.extend(self.logo.iter().map(|(part, c)| (part.to_string(), *c)));
        out
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &ColorAssignment, template: &TemplateInfo) -> Vec<ValidationViolation>;
}

fn palette_names() -> String {
    PALETTE.iter().map(|c| c.as_str()).collect::<Vec<_>>().join(", ")
}

// --- Concrete Rules ---

/// Every requested color must be a themable palette color.
pub struct PaletteRule;

impl ValidationRule for PaletteRule {
    fn name(&self) -> &'static str {
        "palette"
    }

    fn validate(&self, input: &ColorAssignment, _template: &TemplateInfo) -> Vec<ValidationViolation> {
        let mut requested = input.dependents();
        if let Some(bg) = input.background {
            requested.insert(0, ("background".to_string(), bg));
        }
        requested
            .into_iter()
            .filter(|(_, c)| !c.in_palette())
            .map(|(slot, c)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("{} is not a themable color", c),
                slot,
                expected: Some(palette_names()),
                actual: Some(c.to_string()),
                remediation: vec![format!("Use one of: {}", palette_names())],
                repairable: false,
            })
            .collect()
    }
}

/// Badge slots must exist in the template's scope.
pub struct SlotRule;

impl ValidationRule for SlotRule {
    fn name(&self) -> &'static str {
        "slot"
    }

    fn validate(&self, input: &ColorAssignment, template: &TemplateInfo) -> Vec<ValidationViolation> {
        let known: Vec<ColorSlot> = template
            .default_slots
            .iter()
            .map(|(slot, _)| *slot)
            .filter(ColorSlot::is_badge)
            .collect();
        input
            .badges
            .keys()
            .filter(|slot| !known.contains(*slot))
            .map(|slot| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                slot: slot.to_string(),
                message: format!("{} has no badge slot {}", template.key, slot),
                expected: Some(
                    known.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "),
                ),
                actual: Some(slot.to_string()),
                remediation: vec![format!("Remove {} from badges", slot)],
                repairable: false,
            })
            .collect()
    }
}

/// No dependent may match the background it sits on.
pub struct CollisionRule;

impl ValidationRule for CollisionRule {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn validate(&self, input: &ColorAssignment, template: &TemplateInfo) -> Vec<ValidationViolation> {
        let background = input.effective_background(template);
        let options = options_excluding(background)
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        input
            .dependents()
            .into_iter()
            .filter(|(_, c)| *c == background)
            .map(|(slot, c)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("{} matches the {} background", slot, background),
                slot,
                expected: Some(format!("any of {}", options)),
                actual: Some(c.to_string()),
                remediation: vec![
                    format!("Use {}", replacement_for(background)),
                    "Run with failure mode \"repair\" to fix automatically".to_string(),
                ],
                repairable: true,
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(PaletteRule),
                Box::new(SlotRule),
                Box::new(CollisionRule),
            ],
        }
    }

    pub fn validate(
        &self,
        input: &ColorAssignment,
        template: &TemplateInfo,
        mode: FailureMode,
    ) -> ValidationResult {
        let mut violations: Vec<ValidationViolation> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(input, template))
            .collect();

        if mode == FailureMode::Repair {
            for v in violations.iter_mut().filter(|v| v.repairable) {
                v.severity = ViolationSeverity::Warning;
            }
        }

        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);
        ValidationResult {
            valid,
            violations,
            template: template.key,
            failure_mode: mode,
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates;

    fn event() -> &'static TemplateInfo {
        templates::info(TemplateKey::EventPromo).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let result = Validator::new().validate(&ColorAssignment::default(), event(), FailureMode::Block);
        assert!(result.valid);
        assert!(result.violations.is_empty());
    }

    #[test]
    fn test_collision_blocks() {
        let input = ColorAssignment {
            background: Some(RootColor::Navy),
            cta: Some(RootColor::Navy),
            ..Default::default()
        };
        let result = Validator::new().validate(&input, event(), FailureMode::Block);
        assert!(!result.valid);
        let v = &result.violations[0];
        assert_eq!(v.rule, "collision");
        assert_eq!(v.slot, "cta");
        assert_eq!(v.remediation[0], "Use teal");
    }

    #[test]
    fn test_collision_against_default_background() {
        let input = ColorAssignment {
            title: Some(RootColor::Offwhite),
            ..Default::default()
        };
        let result = Validator::new().validate(&input, event(), FailureMode::Block);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].slot, "title");
    }

    #[test]
    fn test_repair_mode_downgrades_collisions_only() {
        let mut input = ColorAssignment {
            background: Some(RootColor::Teal),
            ..Default::default()
        };
        input.logo.insert(LogoPart::Devs, RootColor::Teal);
        let result = Validator::new().validate(&input, event(), FailureMode::Repair);
        assert!(result.valid);
        assert_eq!(result.violations[0].severity, ViolationSeverity::Warning);
        assert_eq!(result.violations[0].slot, "logo-devs");

        input.cta = Some(RootColor::Black);
        let result = Validator::new().validate(&input, event(), FailureMode::Repair);
        assert!(!result.valid);
        assert!(result.summary().contains("palette(cta)"));
    }

    #[test]
    fn test_badges_outside_scope() {
        let mut input = ColorAssignment::default();
        input.badges.insert(ColorSlot::NursingBadge, RootColor::Coral);
        let hack = templates::info(TemplateKey::Hacktoberfest).unwrap();
        let result = Validator::new().validate(&input, hack, FailureMode::Repair);
        assert!(!result.valid);
        assert_eq!(result.violations[0].rule, "slot");
        assert!(Validator::new().validate(&input, event(), FailureMode::Block).valid);
    }
}
