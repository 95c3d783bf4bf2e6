use std::collections::{HashMap, HashSet};
use std::iter;

use indexmap::{IndexMap, IndexSet};

use super::{Block, Position, RuleNum, VarBlock, VarValue, var_label, var_position};
use crate::error::EngineError;
use crate::rules::compat::{is_action_compatible, is_trigger_pair_compatible};
use crate::rules::{RuleDefinition, RuleKind, render_description, rule_definition};

/// A live block in the forest arena.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) rule_num: RuleNum,
    pub(crate) position: Position,
    pub(crate) label: String,
    pub(crate) def: &'static RuleDefinition,
    pub(crate) vars: Vec<VarBlock>,
    pub(crate) parent: Option<RuleNum>,
    pub(crate) children: Vec<RuleNum>,
}

impl Node {
    pub fn rule_num(&self) -> RuleNum {
        self.rule_num
    }

    pub fn def(&self) -> &'static RuleDefinition {
        self.def
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn vars(&self) -> &[VarBlock] {
        &self.vars
    }

    pub fn parent(&self) -> Option<RuleNum> {
        self.parent
    }

    pub fn children(&self) -> &[RuleNum] {
        &self.children
    }

    fn values(&self) -> Vec<VarValue> {
        self.vars.iter().map(|v| v.value.clone()).collect()
    }

    fn relabel(&mut self) {
        self.label = render_description(self.def, Some(&self.values()));
    }
}

/// The authored rule forest: every block lives in one arena keyed by its
/// [`RuleNum`], and is reachable exactly once, either as a root or as a child
/// of exactly one parent.
///
/// Root order is insertion order and is also the dispatch order of rulesets.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: HashMap<RuleNum, Node>,
    roots: IndexSet<RuleNum>,
    next_rule_num: u64,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, num: RuleNum) -> bool {
        self.nodes.contains_key(&num)
    }

    pub fn node(&self, num: RuleNum) -> Option<&Node> {
        self.nodes.get(&num)
    }

    pub fn roots(&self) -> impl Iterator<Item = RuleNum> + '_ {
        self.roots.iter().copied()
    }

    pub fn next_rule_num(&self) -> u64 {
        self.next_rule_num
    }

    /// Never moves the counter backwards.
    pub fn advance_rule_nums_to(&mut self, next: u64) {
        self.next_rule_num = self.next_rule_num.max(next);
    }

    fn get(&self, num: RuleNum) -> Result<&Node, EngineError> {
        self.nodes.get(&num).ok_or(EngineError::UnknownBlock(num))
    }

    fn get_mut(&mut self, num: RuleNum) -> Result<&mut Node, EngineError> {
        self.nodes.get_mut(&num).ok_or(EngineError::UnknownBlock(num))
    }

    /// Strict ancestors of `num`, nearest first.
    pub fn ancestors(&self, num: RuleNum) -> impl Iterator<Item = RuleNum> + '_ {
        iter::successors(self.nodes.get(&num).and_then(|n| n.parent), move |p| {
            self.nodes.get(p).and_then(|n| n.parent)
        })
    }

    // ── Authoring ───────────────────────────────────────────────────────

    /// Allocate a new root block with its type defaults.
    pub fn create(&mut self, kind: RuleKind, id: &str, position: Position) -> Result<RuleNum, EngineError> {
        let def = rule_definition(kind, id)?;
        let num = RuleNum(self.next_rule_num);
        let next = num.0.checked_add(1).ok_or(EngineError::RuleNumsExhausted)?;

        let vars = def
            .user_vars
            .iter()
            .enumerate()
            .map(|(i, var_type)| VarBlock::new(num, i, *var_type, var_type.default_value(), position))
            .collect();
        let mut node = Node {
            rule_num: num,
            position,
            label: String::new(),
            def,
            vars,
            parent: None,
            children: Vec::new(),
        };
        node.relabel();

        self.nodes.insert(num, node);
        self.roots.insert(num);
        self.next_rule_num = next;
        Ok(num)
    }

    /// Move `child` (with its subtree) under `parent`, or back to the root
    /// list when `parent` is `None`. Appends after any existing siblings.
    pub fn reparent(&mut self, child: RuleNum, parent: Option<RuleNum>) -> Result<(), EngineError> {
        self.get(child)?;
        if let Some(parent) = parent {
            self.get(parent)?;
            self.check_placement(child, parent)?;
        }

        self.detach(child);
        match parent {
            Some(parent) => {
                self.get_mut(parent)?.children.push(child);
                self.get_mut(child)?.parent = Some(parent);
            }
            None => {
                self.roots.insert(child);
            }
        }
        Ok(())
    }

    /// Remove a block and its whole subtree. Returns the number of blocks removed.
    pub fn delete(&mut self, num: RuleNum) -> Result<usize, EngineError> {
        self.get(num)?;
        self.detach(num);

        let mut removed = 0;
        let mut stack = vec![num];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Swap the rule a block runs for another of the same kind. Values whose
    /// slot type is unchanged are kept; the others reset to defaults.
    pub fn change_rule_id(&mut self, num: RuleNum, new_id: &str) -> Result<(), EngineError> {
        let node = self.get(num)?;
        let def = rule_definition(node.def.kind, new_id)?;

        let vars = def
            .user_vars
            .iter()
            .enumerate()
            .map(|(i, var_type)| {
                let value = match node.vars.get(i) {
                    Some(old) if old.var_type == *var_type => old.value.clone(),
                    _ => var_type.default_value(),
                };
                VarBlock::new(num, i, *var_type, value, node.position)
            })
            .collect();
        let parent = node.parent;
        let children = node.children.clone();

        let previous = self.get(num)?.clone();
        {
            let node = self.get_mut(num)?;
            node.def = def;
            node.vars = vars;
            node.relabel();
        }

        let checked = match parent {
            Some(parent) => self.check_placement(num, parent),
            None => children.iter().try_for_each(|child| self.check_placement(*child, num)),
        };
        if let Err(err) = checked {
            self.nodes.insert(num, previous);
            return Err(err);
        }
        Ok(())
    }

    pub fn edit_var(&mut self, num: RuleNum, index: usize, value: VarValue) -> Result<(), EngineError> {
        let node = self.get_mut(num)?;
        let var = node
            .vars
            .get_mut(index)
            .ok_or(EngineError::VarIndex { rule_num: num, index })?;
        let value = var.var_type.coerce(value)?;
        var.label = var_label(index, &value);
        var.value = value;
        node.relabel();
        Ok(())
    }

    pub fn move_block(&mut self, num: RuleNum, position: Position) -> Result<(), EngineError> {
        let node = self.get_mut(num)?;
        node.position = position;
        for (i, var) in node.vars.iter_mut().enumerate() {
            var.position = var_position(position, i);
        }
        Ok(())
    }

    fn detach(&mut self, num: RuleNum) {
        let parent = self.nodes.get_mut(&num).and_then(|n| n.parent.take());
        match parent.and_then(|p| self.nodes.get_mut(&p)) {
            Some(parent) => parent.children.retain(|c| *c != num),
            None => {
                self.roots.shift_remove(&num);
            }
        }
    }

    // ── Placement checks ────────────────────────────────────────────────

    /// Validate placing `child`'s subtree directly under `parent`, without
    /// changing anything.
    fn check_placement(&self, child: RuleNum, parent: RuleNum) -> Result<(), EngineError> {
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(EngineError::Cycle { child, parent });
        }
        let child_def = self.get(child)?.def;
        let parent_def = self.get(parent)?.def;
        let misplaced = |reason: &str| EngineError::InvalidPlacement {
            child,
            parent,
            reason: reason.to_string(),
        };
        if child_def.kind == RuleKind::Trigger {
            return Err(misplaced("a TRIGGER block can only be a ruleset root"));
        }
        if parent_def.kind == RuleKind::Do {
            return Err(misplaced("DO blocks cannot have children"));
        }

        let mut provides = false;
        let mut events = Vec::new();
        for id in iter::once(parent).chain(self.ancestors(parent)) {
            let def = self.get(id)?.def;
            provides |= def.provides_shape;
            if matches!(def.kind, RuleKind::Trigger | RuleKind::If) {
                events.push(def.id);
            }
        }
        self.check_subtree(child, parent, provides, &mut events)
    }

    fn check_subtree(
        &self,
        num: RuleNum,
        parent: RuleNum,
        provides: bool,
        events: &mut Vec<&'static str>,
    ) -> Result<(), EngineError> {
        let node = self.get(num)?;
        let def = node.def;
        let incompatible = |reason: String| EngineError::Incompatible {
            child: num,
            parent,
            reason,
        };

        if def.needs_shape && !provides {
            return Err(incompatible(format!(
                "`{}` needs a shape from a FOR loop or a shape event trigger",
                def.id
            )));
        }
        match def.kind {
            RuleKind::If => {
                if let Some(other) = events.iter().find(|e| !is_trigger_pair_compatible(e, def.id)) {
                    return Err(incompatible(format!("`{}` can never hold under `{other}`", def.id)));
                }
            }
            RuleKind::Do => {
                if let Some(other) = events.iter().find(|e| !is_action_compatible(e, def.id)) {
                    return Err(incompatible(format!("`{}` is not allowed under `{other}`", def.id)));
                }
            }
            RuleKind::Trigger | RuleKind::For => {}
        }

        let scoped = matches!(def.kind, RuleKind::Trigger | RuleKind::If);
        if scoped {
            events.push(def.id);
        }
        let provides = provides || def.provides_shape;
        for &child in &node.children {
            self.check_subtree(child, num, provides, events)?;
        }
        if scoped {
            events.pop();
        }
        Ok(())
    }

    // ── Snapshots ───────────────────────────────────────────────────────

    pub fn block(&self, num: RuleNum) -> Option<Block> {
        let node = self.nodes.get(&num)?;
        Some(Block {
            position: node.position,
            label: node.label.clone(),
            rule_kind: node.def.kind,
            rule_id: node.def.id.to_string(),
            rule_num: num,
            vars: node.vars.clone(),
            children: node.children.iter().filter_map(|c| self.block(*c)).collect(),
        })
    }

    /// Every ruleset root in dispatch order.
    pub fn snapshot(&self) -> IndexMap<RuleNum, Block> {
        self.roots
            .iter()
            .filter_map(|num| self.block(*num).map(|block| (*num, block)))
            .collect()
    }

    /// Rebuild a forest from its nested form. Labels are re-derived from the
    /// catalog and values are checked against their slot types; nesting is
    /// taken as given.
    pub fn from_snapshot(rulesets: &IndexMap<RuleNum, Block>) -> Result<Self, EngineError> {
        let mut forest = Forest::new();
        for (key, block) in rulesets {
            if *key != block.rule_num {
                return Err(EngineError::InvalidFile(format!(
                    "ruleset key {key} does not match its block's rule_num {}",
                    block.rule_num
                )));
            }
            forest.insert_block(block, None)?;
            forest.roots.insert(block.rule_num);
        }
        let highest = forest.nodes.keys().map(|n| n.0).max();
        forest.next_rule_num = match highest {
            Some(highest) => highest
                .checked_add(1)
                .ok_or_else(|| EngineError::InvalidFile(format!("rule number {highest} is out of range")))?,
            None => 0,
        };
        Ok(forest)
    }

    fn insert_block(&mut self, block: &Block, parent: Option<RuleNum>) -> Result<(), EngineError> {
        let num = block.rule_num;
        let def = rule_definition(block.rule_kind, &block.rule_id)
            .map_err(|err| EngineError::InvalidFile(err.to_string()))?;
        if self.nodes.contains_key(&num) {
            return Err(EngineError::InvalidFile(format!("rule number {num} appears twice")));
        }
        if block.vars.len() != def.user_vars.len() {
            return Err(EngineError::InvalidFile(format!(
                "block {num} (`{}`) has {} variables, expected {}",
                def.id,
                block.vars.len(),
                def.user_vars.len()
            )));
        }

        let mut vars = Vec::with_capacity(block.vars.len());
        for (i, (var, var_type)) in block.vars.iter().zip(def.user_vars).enumerate() {
            if var.var_type != *var_type {
                return Err(EngineError::InvalidFile(format!(
                    "block {num} variable {i} is a {}, expected {var_type}",
                    var.var_type
                )));
            }
            let value = var_type
                .coerce(var.value.clone())
                .map_err(|err| EngineError::InvalidFile(format!("block {num}: {err}")))?;
            vars.push(VarBlock {
                position: var.position,
                label: var_label(i, &value),
                var_type: *var_type,
                owner_rule_num: num,
                value,
            });
        }

        let mut node = Node {
            rule_num: num,
            position: block.position,
            label: String::new(),
            def,
            vars,
            parent,
            children: block.children.iter().map(|c| c.rule_num).collect(),
        };
        node.relabel();
        self.nodes.insert(num, node);

        for child in &block.children {
            self.insert_block(child, Some(num))?;
        }
        Ok(())
    }

    /// Verify that every block is reachable exactly once and that parent
    /// links agree with child lists.
    pub fn check_integrity(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        let mut stack: Vec<(RuleNum, Option<RuleNum>)> = self.roots.iter().map(|r| (*r, None)).collect();
        while let Some((num, parent)) = stack.pop() {
            let node = self
                .nodes
                .get(&num)
                .ok_or_else(|| format!("dangling reference to block {num}"))?;
            if !seen.insert(num) {
                return Err(format!("block {num} is reachable more than once"));
            }
            if node.parent != parent {
                return Err(format!(
                    "block {num} records parent {:?} but is reached from {:?}",
                    node.parent, parent
                ));
            }
            stack.extend(node.children.iter().map(|c| (*c, Some(num))));
        }
        if seen.len() != self.nodes.len() {
            return Err(format!(
                "{} block(s) are not reachable from any root",
                self.nodes.len() - seen.len()
            ));
        }
        Ok(())
    }
}
