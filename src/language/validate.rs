//! Grammar-compile-time validation
//!
//! Everything here runs once, when the language descriptor is compiled.
//! A failure is a defect in the crate itself and can never be triggered
//! by user content: parse-time code only ever sees a descriptor that
//! passed these checks.
//!
//! Checks:
//! - rule names are unique and every rule reference resolves
//! - no rule derives itself without consuming a token (left recursion
//!   through nullable prefixes included)
//! - the external-token declarations match the scanner's token list,
//!   each exactly once
//! - every composite node kind except the error wrapper is produced by a
//!   rule, so the vocabulary stays the wire contract
//! - the infix precedence table holds token kinds only, without
//!   duplicates

use rustc_hash::{FxHashMap, FxHashSet};

use crate::parser::SyntaxKind;
use crate::parser::scanner::SCANNER_TOKENS;

use super::rules::{Pattern, RuleDef};
use super::{ExternalToken, GrammarError, InfixOp};

pub(crate) fn check(
    rules: &[RuleDef],
    externals: &[ExternalToken],
    infix: &[InfixOp],
) -> Result<(), GrammarError> {
    let index = check_rule_names(rules)?;
    check_references(rules, &index)?;
    check_empty_derivation(rules)?;
    check_externals(externals)?;
    check_coverage(rules)?;
    check_precedence(infix)?;
    Ok(())
}

fn check_rule_names(rules: &[RuleDef]) -> Result<FxHashMap<&'static str, usize>, GrammarError> {
    let mut index = FxHashMap::default();
    for (i, rule) in rules.iter().enumerate() {
        if index.insert(rule.name, i).is_some() {
            return Err(GrammarError::DuplicateRule { name: rule.name });
        }
    }
    Ok(index)
}

fn check_references(
    rules: &[RuleDef],
    index: &FxHashMap<&'static str, usize>,
) -> Result<(), GrammarError> {
    fn walk(
        rule: &'static str,
        pattern: &Pattern,
        index: &FxHashMap<&'static str, usize>,
    ) -> Result<(), GrammarError> {
        match pattern {
            Pattern::Token(_) => Ok(()),
            Pattern::Rule(target) => {
                if index.contains_key(target) {
                    Ok(())
                } else {
                    Err(GrammarError::UndefinedRule {
                        rule,
                        target: *target,
                    })
                }
            }
            Pattern::Seq(items) | Pattern::Choice(items) => {
                items.iter().try_for_each(|item| walk(rule, item, index))
            }
            Pattern::Repeat(inner) | Pattern::Optional(inner) => walk(rule, inner, index),
        }
    }
    rules
        .iter()
        .try_for_each(|rule| walk(rule.name, &rule.pattern, index))
}

/// Reject any rule that can derive itself as its own leftmost part with
/// nothing consumed in between. Works in two steps: a nullability
/// fixpoint, then cycle detection on the "can appear leftmost after only
/// nullable material" edges.
fn check_empty_derivation(rules: &[RuleDef]) -> Result<(), GrammarError> {
    // nullability fixpoint
    let mut nullable: FxHashMap<&'static str, bool> =
        rules.iter().map(|rule| (rule.name, false)).collect();
    loop {
        let mut changed = false;
        for rule in rules {
            if !nullable[rule.name] && pattern_nullable(&rule.pattern, &nullable) {
                nullable.insert(rule.name, true);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    // leftmost edges
    let mut edges: FxHashMap<&'static str, Vec<&'static str>> = FxHashMap::default();
    for rule in rules {
        let mut targets = Vec::new();
        leftmost_refs(&rule.pattern, &nullable, &mut targets);
        edges.insert(rule.name, targets);
    }

    // depth-first cycle search
    let mut done: FxHashSet<&'static str> = FxHashSet::default();
    let mut in_progress: FxHashSet<&'static str> = FxHashSet::default();
    for rule in rules {
        visit(rule.name, &edges, &mut done, &mut in_progress)?;
    }
    Ok(())
}

fn visit(
    name: &'static str,
    edges: &FxHashMap<&'static str, Vec<&'static str>>,
    done: &mut FxHashSet<&'static str>,
    in_progress: &mut FxHashSet<&'static str>,
) -> Result<(), GrammarError> {
    if done.contains(name) {
        return Ok(());
    }
    if !in_progress.insert(name) {
        return Err(GrammarError::EmptyDerivation { rule: name });
    }
    for target in edges.get(name).into_iter().flatten() {
        visit(target, edges, done, in_progress)?;
    }
    in_progress.remove(name);
    done.insert(name);
    Ok(())
}

fn pattern_nullable(pattern: &Pattern, nullable: &FxHashMap<&'static str, bool>) -> bool {
    match pattern {
        Pattern::Token(_) => false,
        Pattern::Rule(name) => nullable.get(name).copied().unwrap_or(false),
        Pattern::Seq(items) => items.iter().all(|item| pattern_nullable(item, nullable)),
        Pattern::Choice(items) => items.iter().any(|item| pattern_nullable(item, nullable)),
        Pattern::Repeat(_) | Pattern::Optional(_) => true,
    }
}

/// Collect the rules reachable in leftmost position with only nullable
/// material before them. Returns whether the whole pattern is nullable,
/// which callers use to decide if scanning continues past it.
fn leftmost_refs(
    pattern: &Pattern,
    nullable: &FxHashMap<&'static str, bool>,
    out: &mut Vec<&'static str>,
) -> bool {
    match pattern {
        Pattern::Token(_) => false,
        Pattern::Rule(name) => {
            out.push(*name);
            nullable.get(*name).copied().unwrap_or(false)
        }
        Pattern::Seq(items) => {
            for item in items {
                if !leftmost_refs(item, nullable, out) {
                    return false;
                }
            }
            true
        }
        Pattern::Choice(items) => {
            let mut any_nullable = false;
            for item in items {
                any_nullable |= leftmost_refs(item, nullable, out);
            }
            any_nullable
        }
        Pattern::Repeat(inner) | Pattern::Optional(inner) => {
            leftmost_refs(inner, nullable, out);
            true
        }
    }
}

fn check_externals(externals: &[ExternalToken]) -> Result<(), GrammarError> {
    let mut declared: FxHashSet<SyntaxKind> = FxHashSet::default();
    for external in externals {
        if !declared.insert(external.kind) {
            return Err(GrammarError::DuplicateExternal {
                name: external.name,
            });
        }
        if !SCANNER_TOKENS.contains(&external.kind) {
            return Err(GrammarError::ExternalNotProduced {
                name: external.name,
            });
        }
    }
    for kind in SCANNER_TOKENS {
        if !declared.contains(kind) {
            return Err(GrammarError::UndeclaredExternal {
                name: kind.name(),
            });
        }
    }
    Ok(())
}

fn check_coverage(rules: &[RuleDef]) -> Result<(), GrammarError> {
    let produced: FxHashSet<SyntaxKind> = rules.iter().filter_map(|rule| rule.kind).collect();
    let first = SyntaxKind::CONFIG_FILE as u16;
    let last = SyntaxKind::ERROR as u16; // exclusive: ERROR is the recovery wrapper
    for raw in first..last {
        let kind = SyntaxKind::from(rowan::SyntaxKind(raw));
        if !produced.contains(&kind) {
            return Err(GrammarError::MissingNodeRule { kind: kind.name() });
        }
    }
    Ok(())
}

fn check_precedence(infix: &[InfixOp]) -> Result<(), GrammarError> {
    let mut seen: FxHashSet<SyntaxKind> = FxHashSet::default();
    for op in infix {
        if !op.token.is_token() || !seen.insert(op.token) {
            return Err(GrammarError::InvalidPrecedence {
                token: op.token.name(),
            });
        }
    }
    Ok(())
}
