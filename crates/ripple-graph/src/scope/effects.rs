//! Effect-set computation.
//!
//! Runs after reference resolution over the whole arena. The rules mirror the
//! value-flow a reviewer would eyeball: declarator initializers feed their
//! declared names, assignment right sides feed the left side, update/delete
//! expressions feed their own argument, and call arguments feed the called
//! function's name when they land on one of its parameters. This is a
//! best-effort heuristic, not a sound data-flow analysis.

use crate::arena::{Field, NodeId, NodeKind};

use super::{pattern_identifiers, reference_identifiers, BindingKind, FileGraph};

pub(crate) fn compute_effects(graph: &mut FileGraph) {
    let ids: Vec<NodeId> = graph.arena.ids().collect();
    for id in ids {
        match graph.arena.node(id).kind {
            NodeKind::VariableDeclarator => declarator(graph, id),
            NodeKind::AssignmentExpression => assignment(graph, id),
            NodeKind::UpdateExpression | NodeKind::UnaryExpression { delete: true } => {
                self_update(graph, id);
            }
            NodeKind::CallExpression => call(graph, id),
            _ => {}
        }
    }
}

fn add_effects(graph: &mut FileGraph, target: NodeId, effects: &[NodeId]) {
    for &effect in effects {
        if effect != target {
            graph.annotation_mut(target).add_effect(effect);
        }
    }
}

/// `const x = expr`: the effect set of `x` is the references inside `expr`.
///
/// The two-element array destructure of a call (`const [state, setState] =
/// useX(init)`) is split: the getter half is fed by the call's first-argument
/// references plus the setter identifier, the setter half stays empty.
fn declarator(graph: &mut FileGraph, declarator: NodeId) {
    let Some(pattern) = graph.arena.child_by_field(declarator, Field::Id) else {
        return;
    };
    let Some(init) = graph.arena.child_by_field(declarator, Field::Init) else {
        return;
    };

    if graph.arena.node(pattern).kind == NodeKind::ArrayPattern
        && graph.arena.node(init).kind == NodeKind::CallExpression
    {
        let elements: Vec<NodeId> = graph
            .arena
            .children_by_field(pattern, Field::Elements)
            .collect();
        if elements.len() == 2 {
            let getter_ids = pattern_identifiers(&graph.arena, elements[0]);
            let setter_ids = pattern_identifiers(&graph.arena, elements[1]);
            let mut effects: Vec<NodeId> = graph
                .arena
                .children_by_field(init, Field::Arguments)
                .next()
                .map(|arg| reference_identifiers(graph, arg))
                .unwrap_or_default();
            effects.extend(&setter_ids);
            for getter in getter_ids {
                add_effects(graph, getter, &effects);
            }
            return;
        }
    }

    let declared = pattern_identifiers(&graph.arena, pattern);
    let effects = reference_identifiers(graph, init);
    for id in declared {
        add_effects(graph, id, &effects);
    }
}

/// `left = right`: every identifier on the left gains the right side's
/// reference set.
fn assignment(graph: &mut FileGraph, expr: NodeId) {
    let Some(left) = graph.arena.child_by_field(expr, Field::Left) else {
        return;
    };
    let Some(right) = graph.arena.child_by_field(expr, Field::Right) else {
        return;
    };
    let left_ids = reference_identifiers(graph, left);
    let right_ids = reference_identifiers(graph, right);
    for id in left_ids {
        add_effects(graph, id, &right_ids);
    }
}

/// `x++` / `delete x.y`: the argument's own effect set gains the references
/// found inside it.
fn self_update(graph: &mut FileGraph, expr: NodeId) {
    let Some(argument) = graph.arena.child_by_field(expr, Field::Argument) else {
        return;
    };
    let ids = reference_identifiers(graph, argument);
    add_effects(graph, argument, &ids);
}

/// Call-site back-propagation: an argument identifier that resolves to a
/// parameter binding links the call-site identifier onto the called
/// function's own name binding (declarator id, assignment left, or method
/// key, depending on where the function value lives).
fn call(graph: &mut FileGraph, expr: NodeId) {
    let ids = reference_identifiers(graph, expr);
    for id in ids {
        let Some(binding) = graph.chosen_binding(id) else {
            continue;
        };
        if graph.annotation(binding).binding != Some(BindingKind::Param) {
            continue;
        }
        let Some(func) = graph
            .arena
            .find_ancestor(binding, |n| n.kind.is_function_like())
        else {
            continue;
        };
        if !reached_through_params(graph, binding, func) {
            continue;
        }
        match graph.arena.node(func).kind {
            NodeKind::FunctionDeclaration => {
                if let Some(fn_id) = graph.arena.child_by_field(func, Field::Id) {
                    add_effects(graph, fn_id, &[id]);
                }
            }
            NodeKind::FunctionExpression | NodeKind::ArrowFunctionExpression => {
                let func_node = graph.arena.node(func);
                let Some(owner) = func_node.parent else {
                    continue;
                };
                match (func_node.field, graph.arena.node(owner).kind) {
                    (Field::Init, NodeKind::VariableDeclarator) => {
                        if let Some(pattern) = graph.arena.child_by_field(owner, Field::Id) {
                            for target in pattern_identifiers(&graph.arena, pattern) {
                                add_effects(graph, target, &[id]);
                            }
                        }
                    }
                    (Field::Right, NodeKind::AssignmentExpression) => {
                        if let Some(left) = graph.arena.child_by_field(owner, Field::Left) {
                            let targets = reference_identifiers(graph, left);
                            for target in targets {
                                add_effects(graph, target, &[id]);
                            }
                        }
                    }
                    (Field::Value, NodeKind::MethodDefinition { .. }) => {
                        if let Some(key) = graph.arena.child_by_field(owner, Field::Key) {
                            add_effects(graph, key, &[id]);
                        }
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
}

/// True when `binding` hangs off `func`'s parameter list rather than its body.
fn reached_through_params(graph: &FileGraph, binding: NodeId, func: NodeId) -> bool {
    let mut current = binding;
    while let Some(parent) = graph.arena.node(current).parent {
        if parent == func {
            return graph.arena.node(current).field == Field::Params;
        }
        current = parent;
    }
    false
}
