//! Test utilities for rebalance tests.
//!
//! Provides a scripted generation service and a fixture that owns everything
//! a [`StrategyContext`] borrows.

#![allow(dead_code)]

pub mod mock_service;

pub use mock_service::{MockResponse, MockService};

use troupe_core::{Line, Orthography, RoleName, RoleSet, ScriptParser, TargetSpec, parse_script, roles_of};
use troupe_rebalance::{QualityGate, RebalanceConfig, StrategyContext};

/// Owns the collaborators of one strategy run.
pub struct Fixture {
    pub service: MockService,
    pub parser: ScriptParser,
    pub roles: RoleSet,
    pub gate: QualityGate,
    pub config: RebalanceConfig,
}

impl Fixture {
    /// Fixture for `script` with default configuration.
    pub fn new(service: MockService, script: &str) -> Self {
        Self::with_config(service, script, RebalanceConfig::default())
    }

    /// Fixture for `script` with explicit configuration.
    pub fn with_config(service: MockService, script: &str, config: RebalanceConfig) -> Self {
        let roles = roles_of(&parse_script(script));
        Self::with_roles(service, script, roles, config)
    }

    /// Fixture with an explicit role set.
    pub fn with_roles(
        service: MockService,
        script: &str,
        roles: RoleSet,
        config: RebalanceConfig,
    ) -> Self {
        let gate = QualityGate::new(&config.quality, Orthography::detect(script))
            .expect("default quality config is valid");
        Self {
            service,
            parser: ScriptParser::new(config.parser.clone()),
            roles,
            gate,
            config,
        }
    }

    /// Borrow a strategy context.
    pub fn ctx(&self) -> StrategyContext<'_> {
        StrategyContext::new(&self.service, &self.parser, &self.roles, &self.gate, &self.config)
    }
}

/// Build a target from `(name, count)` pairs.
pub fn target(pairs: &[(&str, usize)]) -> TargetSpec {
    pairs
        .iter()
        .map(|(name, n)| (RoleName::new(name), *n))
        .collect()
}

/// Build a role set from names, in order.
pub fn roles(names: &[&str]) -> RoleSet {
    names.iter().map(|name| RoleName::new(name)).collect()
}

/// True if every line of `needle` appears in `haystack` in the same relative order.
pub fn is_subsequence(needle: &[Line], haystack: &[Line]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|line| rest.any(|candidate| candidate == line))
}

/// Dialogue lines only, raw indices dropped.
pub fn dialogue(lines: &[Line]) -> Vec<Line> {
    without_indices(lines)
        .into_iter()
        .filter(|l| l.is_dialogue())
        .collect()
}

/// Lines with raw indices dropped, for comparing across edits.
pub fn without_indices(lines: &[Line]) -> Vec<Line> {
    lines
        .iter()
        .map(|l| match l {
            Line::Dialogue {
                speaker, utterance, ..
            } => Line::dialogue(speaker.clone(), utterance.clone()),
            Line::Other { text, .. } => Line::other(text.clone()),
        })
        .collect()
}
