//! Color Constraint Resolver
//!
//! Every template scope has one background anchor and a set of dependent
//! slots. A dependent slot never holds the anchor's color: anchor changes
//! repair colliding slots before returning, and direct assignments that
//! would collide are rejected.
//!
//! The logo's three word colors are shared by all templates. They are
//! checked against whichever template the caller says is active.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::{ColorRejection, EngineError};
use crate::palette::{options_excluding, RootColor, PALETTE};
use crate::templates::{self, ColorSlot, LogoPart, TemplateKey, DEFAULT_LOGO_COLOR};

/// One corrective reassignment made by a repair pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRepair {
    pub slot: String,
    pub from: RootColor,
    pub to: RootColor,
}

/// First palette entry, in canonical order, that differs from `anchor`.
pub fn replacement_for(anchor: RootColor) -> RootColor {
    PALETTE
        .into_iter()
        .find(|c| *c != anchor)
        .unwrap_or(PALETTE[0])
}

/// Pure repair: every slot equal to `anchor` becomes `replacement_for(anchor)`.
pub fn repair<K: Ord + Clone>(
    slots: &BTreeMap<K, RootColor>,
    anchor: RootColor,
) -> BTreeMap<K, RootColor> {
    let fallback = replacement_for(anchor);
    slots
        .iter()
        .map(|(k, c)| (k.clone(), if *c == anchor { fallback } else { *c }))
        .collect()
}

fn repair_in_place<K: Ord + Clone + Display>(
    slots: &mut BTreeMap<K, RootColor>,
    anchor: RootColor,
) -> Vec<SlotRepair> {
    let repaired = repair(slots, anchor);
    let changes: Vec<SlotRepair> = slots
        .iter()
        .filter_map(|(k, before)| {
            let after = repaired.get(k).copied().unwrap_or(*before);
            (after != *before).then(|| SlotRepair {
                slot: k.to_string(),
                from: *before,
                to: after,
            })
        })
        .collect();
    *slots = repaired;
    changes
}

fn ensure_themable(slot: &str, color: RootColor) -> Result<(), EngineError> {
    if color.in_palette() {
        Ok(())
    } else {
        Err(EngineError::InvalidColorChoice {
            slot: slot.to_string(),
            color,
            reason: ColorRejection::OutsidePalette,
        })
    }
}

/// Anchor plus dependents for one template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeColors {
    pub background: RootColor,
    pub slots: BTreeMap<ColorSlot, RootColor>,
}

/// Colors a template renderer consumes, after all repairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedColors {
    pub background: RootColor,
    pub cta: RootColor,
    pub title: RootColor,
    #[serde(default)]
    pub badges: BTreeMap<ColorSlot, RootColor>,
    pub logo: BTreeMap<LogoPart, RootColor>,
}

impl ResolvedColors {
    pub fn badge(&self, slot: ColorSlot) -> RootColor {
        self.badges.get(&slot).copied().unwrap_or(self.title)
    }

    pub fn logo_part(&self, part: LogoPart) -> RootColor {
        self.logo.get(&part).copied().unwrap_or(DEFAULT_LOGO_COLOR)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorResolver {
    scopes: BTreeMap<TemplateKey, ScopeColors>,
    logo: BTreeMap<LogoPart, RootColor>,
}

impl ColorResolver {
    /// Resolver seeded with every template's default colors.
    pub fn new() -> Self {
        let scopes = templates::all()
            .iter()
            .map(|t| {
                let slots = t.default_slots.iter().copied().collect();
                (
                    t.key,
                    ScopeColors {
                        background: t.default_background,
                        slots,
                    },
                )
            })
            .collect();
        let logo = LogoPart::ALL
            .into_iter()
            .map(|p| (p, DEFAULT_LOGO_COLOR))
            .collect();
        Self { scopes, logo }
    }

    pub fn scope(&self, scope: TemplateKey) -> Result<&ScopeColors, EngineError> {
        self.scopes
            .get(&scope)
            .ok_or_else(|| EngineError::UnknownLayoutKey(scope.to_string()))
    }

    fn scope_mut(&mut self, scope: TemplateKey) -> Result<&mut ScopeColors, EngineError> {
        self.scopes
            .get_mut(&scope)
            .ok_or_else(|| EngineError::UnknownLayoutKey(scope.to_string()))
    }

    pub fn anchor(&self, scope: TemplateKey) -> Result<RootColor, EngineError> {
        Ok(self.scope(scope)?.background)
    }

    pub fn slot(&self, scope: TemplateKey, slot: ColorSlot) -> Result<RootColor, EngineError> {
        self.scope(scope)?
            .slots
            .get(&slot)
            .copied()
            .ok_or_else(|| EngineError::UnknownSlot {
                scope: scope.to_string(),
                slot: slot.to_string(),
            })
    }

    pub fn logo(&self, part: LogoPart) -> RootColor {
        self.logo.get(&part).copied().unwrap_or(DEFAULT_LOGO_COLOR)
    }

    /// Set a scope's background and repair its dependents synchronously.
    ///
    /// When `scope` is the active template the logo is re-validated too.
    /// Returns every reassignment made.
    pub fn set_anchor(
        &mut self,
        scope: TemplateKey,
        color: RootColor,
        active: TemplateKey,
    ) -> Result<Vec<SlotRepair>, EngineError> {
        ensure_themable("background", color)?;
        let colors = self.scope_mut(scope)?;
        colors.background = color;
        let mut repairs = repair_in_place(&mut colors.slots, color);
        if scope == active {
            repairs.extend(self.activate(active)?);
        }
        for r in &repairs {
            debug!("{}: background {} repaired {} {} -> {}", scope, color, r.slot, r.from, r.to);
        }
        Ok(repairs)
    }

    /// Assign a dependent slot. Rejected without mutation if it would
    /// collide with the scope's background.
    pub fn set_dependent(
        &mut self,
        scope: TemplateKey,
        slot: ColorSlot,
        color: RootColor,
    ) -> Result<(), EngineError> {
        ensure_themable(slot.as_str(), color)?;
        let colors = self.scope_mut(scope)?;
        if !colors.slots.contains_key(&slot) {
            return Err(EngineError::UnknownSlot {
                scope: scope.to_string(),
                slot: slot.to_string(),
            });
        }
        if color == colors.background {
            return Err(EngineError::InvalidColorChoice {
                slot: slot.to_string(),
                color,
                reason: ColorRejection::MatchesBackground(colors.background),
            });
        }
        colors.slots.insert(slot, color);
        Ok(())
    }

    /// Choices offerable for any dependent slot of `scope`.
    pub fn available_options(&self, scope: TemplateKey) -> Result<Vec<RootColor>, EngineError> {
        Ok(options_excluding(self.anchor(scope)?))
    }

    /// Advance a slot to the next offerable color after its current one, wrapping.
    pub fn cycle_next(
        &mut self,
        scope: TemplateKey,
        slot: ColorSlot,
    ) -> Result<RootColor, EngineError> {
        let options = self.available_options(scope)?;
        let current = self.slot(scope, slot)?;
        let next = match options.iter().position(|c| *c == current) {
            Some(idx) => options[(idx + 1) % options.len()],
            None => options.first().copied().unwrap_or(current),
        };
        self.set_dependent(scope, slot, next)?;
        Ok(next)
    }

    /// Assign a logo word color, checked against the active template's background.
    pub fn set_logo_part(
        &mut self,
        active: TemplateKey,
        part: LogoPart,
        color: RootColor,
    ) -> Result<(), EngineError> {
        let slot = part.to_string();
        ensure_themable(&slot, color)?;
        let anchor = self.anchor(active)?;
        if color == anchor {
            return Err(EngineError::InvalidColorChoice {
                slot,
                color,
                reason: ColorRejection::MatchesBackground(anchor),
            });
        }
        self.logo.insert(part, color);
        Ok(())
    }

    /// Re-validate the shared logo against a newly active template.
    pub fn activate(&mut self, active: TemplateKey) -> Result<Vec<SlotRepair>, EngineError> {
        let anchor = self.anchor(active)?;
        let repairs = repair_in_place(&mut self.logo, anchor);
        if !repairs.is_empty() {
            debug!("logo re-validated against {} ({}): {} repaired", active, anchor, repairs.len());
        }
        Ok(repairs)
    }

    pub fn resolved(&self, active: TemplateKey) -> Result<ResolvedColors, EngineError> {
        let colors = self.scope(active)?;
        let badges = colors
            .slots
            .iter()
            .filter(|(slot, _)| slot.is_badge())
            .map(|(slot, c)| (*slot, *c))
            .collect();
        Ok(ResolvedColors {
            background: colors.background,
            cta: self.slot(active, ColorSlot::Cta)?,
            title: self.slot(active, ColorSlot::Title)?,
            badges,
            logo: self.logo.clone(),
        })
    }
}

impl Default for ColorResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HACK: TemplateKey = TemplateKey::Hacktoberfest;
    const EVENT: TemplateKey = TemplateKey::EventPromo;

    #[test]
    fn test_replacement_is_first_other_palette_entry() {
        assert_eq!(replacement_for(RootColor::Teal), RootColor::Coral);
        assert_eq!(replacement_for(RootColor::Coral), RootColor::Teal);
        assert_eq!(replacement_for(RootColor::Offwhite), RootColor::Teal);
    }

    #[test]
    fn test_pure_repair() {
        let mut slots = BTreeMap::new();
        slots.insert("a", RootColor::Navy);
        slots.insert("b", RootColor::Coral);
        let out = repair(&slots, RootColor::Navy);
        assert_eq!(out["a"], RootColor::Teal);
        assert_eq!(out["b"], RootColor::Coral);
        // input untouched
        assert_eq!(slots["a"], RootColor::Navy);
    }

    #[test]
    fn test_set_anchor_repairs_dependents() {
        let mut r = ColorResolver::new();
        // title is teal by default
        let repairs = r.set_anchor(HACK, RootColor::Teal, HACK).unwrap();
        assert_eq!(r.slot(HACK, ColorSlot::Title).unwrap(), RootColor::Coral);
        assert_eq!(r.slot(HACK, ColorSlot::Cta).unwrap(), RootColor::Coral);
        assert_eq!(
            repairs,
            vec![SlotRepair {
                slot: "title".into(),
                from: RootColor::Teal,
                to: RootColor::Coral
            }]
        );
    }

    #[test]
    fn test_scopes_are_independent() {
        let mut r = ColorResolver::new();
        r.set_anchor(EVENT, RootColor::Coral, EVENT).unwrap();
        assert_eq!(r.slot(EVENT, ColorSlot::Cta).unwrap(), RootColor::Teal);
        assert_eq!(r.slot(HACK, ColorSlot::Cta).unwrap(), RootColor::Coral);
    }

    #[test]
    fn test_set_dependent_rejects_collision() {
        let mut r = ColorResolver::new();
        let err = r
            .set_dependent(HACK, ColorSlot::Cta, RootColor::Yellow)
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(r.slot(HACK, ColorSlot::Cta).unwrap(), RootColor::Coral);
    }

    #[test]
    fn test_set_dependent_unknown_slot() {
        let mut r = ColorResolver::new();
        let err = r
            .set_dependent(HACK, ColorSlot::AlliesBadge, RootColor::Teal)
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownSlot { .. }));
    }

    #[test]
    fn test_black_is_not_themable() {
        let mut r = ColorResolver::new();
        assert!(r.set_anchor(HACK, RootColor::Black, HACK).is_err());
        assert!(r.set_dependent(HACK, ColorSlot::Title, RootColor::Black).is_err());
        assert_eq!(r.anchor(HACK).unwrap(), RootColor::Yellow);
    }

    #[test]
    fn test_cycle_next_walks_options_and_wraps() {
        let mut r = ColorResolver::new();
        // offwhite background: options teal, coral, yellow, navy
        assert_eq!(r.cycle_next(EVENT, ColorSlot::AlliesBadge).unwrap(), RootColor::Teal);
        assert_eq!(r.cycle_next(EVENT, ColorSlot::AlliesBadge).unwrap(), RootColor::Coral);
        assert_eq!(r.cycle_next(EVENT, ColorSlot::AlliesBadge).unwrap(), RootColor::Yellow);
        assert_eq!(r.cycle_next(EVENT, ColorSlot::AlliesBadge).unwrap(), RootColor::Navy);
        assert_eq!(r.slot(EVENT, ColorSlot::NursingBadge).unwrap(), RootColor::Navy);
    }

    #[test]
    fn test_logo_follows_active_scope() {
        let mut r = ColorResolver::new();
        // navy event background while hacktoberfest is active leaves the logo alone
        r.set_anchor(EVENT, RootColor::Navy, HACK).unwrap();
        assert_eq!(r.logo(LogoPart::Women), RootColor::Navy);

        let repairs = r.activate(EVENT).unwrap();
        assert_eq!(repairs.len(), 3);
        for part in LogoPart::ALL {
            assert_eq!(r.logo(part), RootColor::Teal);
        }
    }

    #[test]
    fn test_logo_assignment_checked_against_active() {
        let mut r = ColorResolver::new();
        assert!(r.set_logo_part(HACK, LogoPart::Devs, RootColor::Yellow).is_err());
        r.set_logo_part(EVENT, LogoPart::Devs, RootColor::Yellow).unwrap();
        assert_eq!(r.logo(LogoPart::Devs), RootColor::Yellow);
    }

    #[test]
    fn test_resolved_snapshot() {
        let r = ColorResolver::new();
        let resolved = r.resolved(EVENT).unwrap();
        assert_eq!(resolved.background, RootColor::Offwhite);
        assert_eq!(resolved.badges.len(), 3);
        assert!(r.resolved(HACK).unwrap().badges.is_empty());
    }
}
