//! Static checks over a type model.
//!
//! ## Rules
//!
//! - **Inconsistent type name**: a user type's `name` must equal its key.
//! - **Invalid base type**: struct bases must resolve (through typedefs) to structs of
//!   the same union-ness; enum bases must resolve to enums.
//! - **Redefinition**: member names are unique across a struct's inherited and own
//!   members, value names likewise for enums, and member names are unique across an
//!   action's `path`, `query` and `input` sections.
//! - **Circular base type**: inheritance graphs must be acyclic.
//! - **Circular typedef**: a typedef alias chain must end at a non-typedef type.
//! - **Unknown type** / **action reference**: user type references must name a
//!   defined, non-action type.
//! - **Invalid dictionary key type**: dict keys must be `string` or an enum.
//! - **Invalid attribute**: `int`/`float` admit numeric bounds, `string`/arrays/dicts
//!   admit length bounds, everything admits `nullable`.
//!
//! [`SchemaMarkdownParser::finalize`](crate::parser::SchemaMarkdownParser::finalize)
//! runs [`lint`] and attributes each message to a file position.

use crate::ast::*;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Identifies which rule produced the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LintRule {
    InconsistentTypeName,
    InvalidBaseType,
    Redefinition,
    CircularBaseType,
    CircularTypedef,
    UnknownType,
    ActionReference,
    InvalidDictKeyType,
    InvalidAttribute,
}

/// A single finding: the type (and member, when member-specific) it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct LintMessage {
    pub type_name: String,
    pub member: Option<String>,
    pub rule: LintRule,
    pub message: String,
}

/// Run all rules over a type model. Messages come out in type-name order.
pub fn lint(types: &Types) -> Vec<LintMessage> {
    let mut out = Vec::new();
    for (type_name, user_type) in types {
        if type_name != user_type.name() {
            out.push(LintMessage {
                type_name: type_name.clone(),
                member: None,
                rule: LintRule::InconsistentTypeName,
                message: format!(
                    "Inconsistent type name '{}' for '{}'",
                    user_type.name(),
                    type_name
                ),
            });
        }
        match user_type {
            UserType::Struct(s) => lint_struct(&mut out, types, type_name, s),
            UserType::Enum(e) => lint_enum(&mut out, types, type_name, e),
            UserType::Typedef(typedef) => {
                if is_circular_typedef(types, typedef) {
                    push(
                        &mut out,
                        type_name,
                        None,
                        LintRule::CircularTypedef,
                        format!("Circular typedef detected for type '{type_name}'"),
                    );
                }
                let mut context = Context::new(&mut out, types, type_name, None);
                context.check_type(&typedef.ty, typedef.attr.as_ref());
            }
            UserType::Action(action) => lint_action(&mut out, types, type_name, action),
        }
    }
    out
}

/// True when following the alias chain revisits a typedef instead of reaching a
/// struct, enum, builtin or container.
pub(crate) fn is_circular_typedef(types: &Types, typedef: &Typedef) -> bool {
    match effective_type(types, &typedef.ty) {
        TypeRef::User(name) => matches!(types.get(name), Some(UserType::Typedef(_))),
        _ => false,
    }
}

fn push(out: &mut Vec<LintMessage>, type_name: &str, member: Option<&str>, rule: LintRule, message: String) {
    out.push(LintMessage {
        type_name: type_name.to_string(),
        member: member.map(str::to_string),
        rule,
        message,
    });
}

fn lint_struct(out: &mut Vec<LintMessage>, types: &Types, type_name: &str, s: &Struct) {
    for base in s.bases() {
        let valid = effective_user_type(types, base)
            .and_then(UserType::as_struct)
            .is_some_and(|base_struct| base_struct.union == s.union);
        if !valid {
            push(out, type_name, None, LintRule::InvalidBaseType, format!("Invalid struct base type '{base}'"));
        }
    }

    let mut members = Vec::new();
    let walk = visit_inherited(types, s, &mut HashSet::new(), &mut |member| members.push(member));
    let mut seen = HashSet::new();
    for member in members {
        if !seen.insert(member.name.as_str()) {
            push(
                out,
                type_name,
                Some(&member.name),
                LintRule::Redefinition,
                format!("Redefinition of '{}' member '{}'", type_name, member.name),
            );
        }
        let mut context = Context::new(out, types, &s.name, Some(&member.name));
        context.check_type(&member.ty, member.attr.as_ref());
    }
    if walk.is_err() {
        push(
            out,
            type_name,
            None,
            LintRule::CircularBaseType,
            format!("Circular base type detected for type '{type_name}'"),
        );
    }
}

fn lint_enum(out: &mut Vec<LintMessage>, types: &Types, type_name: &str, e: &Enum) {
    for base in e.bases() {
        if effective_user_type(types, base).and_then(UserType::as_enum).is_none() {
            push(out, type_name, None, LintRule::InvalidBaseType, format!("Invalid enum base type '{base}'"));
        }
    }

    let mut values = Vec::new();
    let walk = visit_inherited(types, e, &mut HashSet::new(), &mut |value| values.push(value));
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value.name.as_str()) {
            push(
                out,
                type_name,
                Some(&value.name),
                LintRule::Redefinition,
                format!("Redefinition of '{}' value '{}'", type_name, value.name),
            );
        }
    }
    if walk.is_err() {
        push(
            out,
            type_name,
            None,
            LintRule::CircularBaseType,
            format!("Circular base type detected for type '{type_name}'"),
        );
    }
}

fn lint_action(out: &mut Vec<LintMessage>, types: &Types, type_name: &str, action: &Action) {
    for section in ActionSection::ALL {
        if let Some(section_type) = action.section(section) {
            let mut context = Context::new(out, types, type_name, None);
            context.check_type(&TypeRef::User(section_type.to_string()), None);
        }
    }

    // Member name -> owning section struct names, in first-seen order.
    let mut member_sections: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for section in ActionSection::INPUTS {
        let Some(section_struct) = action
            .section(section)
            .and_then(|name| effective_user_type(types, name))
            .and_then(UserType::as_struct)
        else {
            continue;
        };
        let mut members = Vec::new();
        if visit_inherited(types, section_struct, &mut HashSet::new(), &mut |m| members.push(m)).is_err() {
            continue;
        }
        for member in members {
            member_sections
                .entry(member.name.as_str())
                .or_default()
                .push(section_struct.name.as_str());
        }
    }
    for (member, sections) in member_sections {
        if sections.len() > 1 {
            for section_type in sections {
                push(
                    out,
                    section_type,
                    Some(member),
                    LintRule::Redefinition,
                    format!("Redefinition of '{section_type}' member '{member}'"),
                );
            }
        }
    }
}

/// Type-expression checks for one definition site; messages are suffixed with the
/// site (`from 'Type'` or `from 'Type' member 'name'`).
struct Context<'o, 't> {
    out: &'o mut Vec<LintMessage>,
    types: &'t Types,
    type_name: &'t str,
    member: Option<&'t str>,
}

impl<'o, 't> Context<'o, 't> {
    fn new(out: &'o mut Vec<LintMessage>, types: &'t Types, type_name: &'t str, member: Option<&'t str>) -> Self {
        Self {
            out,
            types,
            type_name,
            member,
        }
    }

    fn error(&mut self, rule: LintRule, message: String) {
        let message = match self.member {
            Some(member) => format!("{message} from '{}' member '{member}'", self.type_name),
            None => format!("{message} from '{}'", self.type_name),
        };
        push(self.out, self.type_name, self.member, rule, message);
    }

    fn check_type(&mut self, ty: &TypeRef, attr: Option<&Attributes>) {
        match ty {
            TypeRef::Builtin(_) => {}
            TypeRef::Array(array) => {
                let element = effective_type(self.types, &array.ty);
                self.check_type(element, array.attr.as_ref());
            }
            TypeRef::Dict(dict) => {
                let value = effective_type(self.types, &dict.ty);
                self.check_type(value, dict.attr.as_ref());
                if let Some(key_type) = &dict.key_type {
                    let key = effective_type(self.types, key_type);
                    self.check_type(key, dict.key_attr.as_ref());
                    let valid_key = match key {
                        TypeRef::Builtin(BuiltinType::String) => true,
                        TypeRef::User(name) => matches!(self.types.get(name), Some(UserType::Enum(_))),
                        _ => false,
                    };
                    if !valid_key {
                        self.error(LintRule::InvalidDictKeyType, "Invalid dictionary key type".to_string());
                    }
                }
            }
            TypeRef::User(name) => match self.types.get(name) {
                None => self.error(LintRule::UnknownType, format!("Unknown type '{name}'")),
                Some(UserType::Action(_)) => {
                    self.error(LintRule::ActionReference, format!("Invalid reference to action '{name}'"))
                }
                Some(_) => {}
            },
        }

        if let Some(attr) = attr {
            let allowed = allowed_family(effective_type(self.types, ty));
            for (key, bound) in attr.constraints() {
                if allowed != Some(key.is_length()) {
                    self.error(LintRule::InvalidAttribute, format!("Invalid attribute '{}'", key.describe(bound)));
                }
            }
        }
    }
}

/// The bound family an effective type admits: `Some(false)` numeric, `Some(true)`
/// length, `None` neither.
fn allowed_family(ty: &TypeRef) -> Option<bool> {
    match ty {
        TypeRef::Builtin(BuiltinType::Int | BuiltinType::Float) => Some(false),
        TypeRef::Builtin(BuiltinType::String) | TypeRef::Array(_) | TypeRef::Dict(_) => Some(true),
        _ => None,
    }
}
