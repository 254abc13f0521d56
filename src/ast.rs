//! Type model for Schema Markdown: user types, type references and attributes.
//!
//! The JSON shape of these types (via serde) is the type model data contract:
//! a map of type name to `{"struct": ...}`, `{"enum": ...}`, `{"typedef": ...}`
//! or `{"action": ...}`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Map of user type name to user type.
pub type Types = BTreeMap<String, UserType>;

fn is_false(value: &bool) -> bool {
    !*value
}

/// A titled type model, as written by `schema-markdown compile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeModel {
    pub title: String,
    pub types: Types,
}

/// One of the four definable kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Struct(Struct),
    Enum(Enum),
    Typedef(Typedef),
    Action(Action),
}

impl UserType {
    pub fn name(&self) -> &str {
        match self {
            UserType::Struct(s) => &s.name,
            UserType::Enum(e) => &e.name,
            UserType::Typedef(t) => &t.name,
            UserType::Action(a) => &a.name,
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        match self {
            UserType::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&Enum> {
        match self {
            UserType::Enum(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Struct {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_group: Option<String>,
    /// Exactly one member must be set.
    #[serde(default, skip_serializing_if = "is_false")]
    pub union: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<Member>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<Attributes>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enum {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<EnumValue>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typedef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_group: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<Attributes>,
}

/// A JSON web API. Section fields hold the names of synthesized types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<ActionUrl>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
}

impl Action {
    pub fn section(&self, section: ActionSection) -> Option<&str> {
        match section {
            ActionSection::Path => self.path.as_deref(),
            ActionSection::Query => self.query.as_deref(),
            ActionSection::Input => self.input.as_deref(),
            ActionSection::Output => self.output.as_deref(),
            ActionSection::Errors => self.errors.as_deref(),
        }
    }

    pub fn set_section(&mut self, section: ActionSection, type_name: String) {
        let slot = match section {
            ActionSection::Path => &mut self.path,
            ActionSection::Query => &mut self.query,
            ActionSection::Input => &mut self.input,
            ActionSection::Output => &mut self.output,
            ActionSection::Errors => &mut self.errors,
        };
        *slot = Some(type_name);
    }
}

/// Action URL; a missing method matches any HTTP method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionUrl {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSection {
    Path,
    Query,
    Input,
    Output,
    Errors,
}

impl ActionSection {
    pub const ALL: [ActionSection; 5] = [
        ActionSection::Path,
        ActionSection::Query,
        ActionSection::Input,
        ActionSection::Output,
        ActionSection::Errors,
    ];

    /// Sections whose members merge into one call signature.
    pub const INPUTS: [ActionSection; 3] =
        [ActionSection::Path, ActionSection::Query, ActionSection::Input];

    pub fn as_str(self) -> &'static str {
        match self {
            ActionSection::Path => "path",
            ActionSection::Query => "query",
            ActionSection::Input => "input",
            ActionSection::Output => "output",
            ActionSection::Errors => "errors",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ActionSection::ALL.into_iter().find(|s| s.as_str() == name)
    }
}

/// Type expression at a member, typedef, or container element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRef {
    Builtin(BuiltinType),
    /// Resolved by name at validation time.
    User(String),
    Array(Box<ArrayType>),
    Dict(Box<DictType>),
}

impl TypeRef {
    /// Builtin tag for builtin names, otherwise a user type reference.
    pub fn from_name(name: &str) -> TypeRef {
        match BuiltinType::from_name(name) {
            Some(builtin) => TypeRef::Builtin(builtin),
            None => TypeRef::User(name.to_string()),
        }
    }

    /// Name used in messages: the builtin or user type name, `array`, or `dict`.
    pub fn type_name(&self) -> &str {
        match self {
            TypeRef::Builtin(builtin) => builtin.as_str(),
            TypeRef::User(name) => name,
            TypeRef::Array(_) => "array",
            TypeRef::Dict(_) => "dict",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinType {
    Any,
    Bool,
    Date,
    Datetime,
    Float,
    Int,
    Object,
    String,
    Uuid,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 9] = [
        BuiltinType::Any,
        BuiltinType::Bool,
        BuiltinType::Date,
        BuiltinType::Datetime,
        BuiltinType::Float,
        BuiltinType::Int,
        BuiltinType::Object,
        BuiltinType::String,
        BuiltinType::Uuid,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BuiltinType::Any => "any",
            BuiltinType::Bool => "bool",
            BuiltinType::Date => "date",
            BuiltinType::Datetime => "datetime",
            BuiltinType::Float => "float",
            BuiltinType::Int => "int",
            BuiltinType::Object => "object",
            BuiltinType::String => "string",
            BuiltinType::Uuid => "uuid",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BuiltinType::ALL.into_iter().find(|b| b.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayType {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<Attributes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictType {
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attr: Option<Attributes>,
    /// `None` means `string`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<TypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_attr: Option<Attributes>,
}

/// Constraints at a type usage site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes {
    #[serde(default, skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eq: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(rename = "lenEq", default, skip_serializing_if = "Option::is_none")]
    pub len_eq: Option<u64>,
    #[serde(rename = "lenLT", default, skip_serializing_if = "Option::is_none")]
    pub len_lt: Option<u64>,
    #[serde(rename = "lenLTE", default, skip_serializing_if = "Option::is_none")]
    pub len_lte: Option<u64>,
    #[serde(rename = "lenGT", default, skip_serializing_if = "Option::is_none")]
    pub len_gt: Option<u64>,
    #[serde(rename = "lenGTE", default, skip_serializing_if = "Option::is_none")]
    pub len_gte: Option<u64>,
}

impl Attributes {
    /// Set bounds in evaluation order (eq, lt, lte, gt, gte, then the length family).
    pub fn constraints(&self) -> Vec<(AttrKey, f64)> {
        let numeric = [
            (AttrKey::Eq, self.eq),
            (AttrKey::Lt, self.lt),
            (AttrKey::Lte, self.lte),
            (AttrKey::Gt, self.gt),
            (AttrKey::Gte, self.gte),
        ];
        let length = [
            (AttrKey::LenEq, self.len_eq),
            (AttrKey::LenLt, self.len_lt),
            (AttrKey::LenLte, self.len_lte),
            (AttrKey::LenGt, self.len_gt),
            (AttrKey::LenGte, self.len_gte),
        ];
        numeric
            .into_iter()
            .filter_map(|(key, v)| v.map(|v| (key, v)))
            .chain(
                length
                    .into_iter()
                    .filter_map(|(key, v)| v.map(|v| (key, v as f64))),
            )
            .collect()
    }

    /// Set a numeric bound. Length keys are ignored; use [`Attributes::set_length`].
    pub fn set_compare(&mut self, key: AttrKey, value: f64) {
        match key {
            AttrKey::Eq => self.eq = Some(value),
            AttrKey::Lt => self.lt = Some(value),
            AttrKey::Lte => self.lte = Some(value),
            AttrKey::Gt => self.gt = Some(value),
            AttrKey::Gte => self.gte = Some(value),
            _ => {}
        }
    }

    /// Set a length bound. Numeric keys are ignored; use [`Attributes::set_compare`].
    pub fn set_length(&mut self, key: AttrKey, value: u64) {
        match key {
            AttrKey::LenEq => self.len_eq = Some(value),
            AttrKey::LenLt => self.len_lt = Some(value),
            AttrKey::LenLte => self.len_lte = Some(value),
            AttrKey::LenGt => self.len_gt = Some(value),
            AttrKey::LenGte => self.len_gte = Some(value),
            _ => {}
        }
    }
}

/// A single numeric or length bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttrKey {
    Eq,
    Lt,
    Lte,
    Gt,
    Gte,
    LenEq,
    LenLt,
    LenLte,
    LenGt,
    LenGte,
}

impl AttrKey {
    pub fn is_length(self) -> bool {
        matches!(
            self,
            AttrKey::LenEq | AttrKey::LenLt | AttrKey::LenLte | AttrKey::LenGt | AttrKey::LenGte
        )
    }

    /// Operator text as written in Schema Markdown.
    pub fn op_text(self) -> &'static str {
        match self {
            AttrKey::Eq => "==",
            AttrKey::Lt => "<",
            AttrKey::Lte => "<=",
            AttrKey::Gt => ">",
            AttrKey::Gte => ">=",
            AttrKey::LenEq => "len ==",
            AttrKey::LenLt => "len <",
            AttrKey::LenLte => "len <=",
            AttrKey::LenGt => "len >",
            AttrKey::LenGte => "len >=",
        }
    }

    /// Maps a comparison operator to its key in the numeric or length family.
    pub fn from_op(op: &str, length: bool) -> Option<Self> {
        let key = match (op, length) {
            ("==", false) => AttrKey::Eq,
            ("<", false) => AttrKey::Lt,
            ("<=", false) => AttrKey::Lte,
            (">", false) => AttrKey::Gt,
            (">=", false) => AttrKey::Gte,
            ("==", true) => AttrKey::LenEq,
            ("<", true) => AttrKey::LenLt,
            ("<=", true) => AttrKey::LenLte,
            (">", true) => AttrKey::LenGt,
            (">=", true) => AttrKey::LenGte,
            _ => return None,
        };
        Some(key)
    }

    pub fn holds(self, lhs: f64, bound: f64) -> bool {
        match self {
            AttrKey::Eq | AttrKey::LenEq => lhs == bound,
            AttrKey::Lt | AttrKey::LenLt => lhs < bound,
            AttrKey::Lte | AttrKey::LenLte => lhs <= bound,
            AttrKey::Gt | AttrKey::LenGt => lhs > bound,
            AttrKey::Gte | AttrKey::LenGte => lhs >= bound,
        }
    }

    /// `"<op> <value>"` with the bound rendered by [`format_number`].
    pub fn describe(self, bound: f64) -> String {
        format!("{} {}", self.op_text(), format_number(bound))
    }
}

/// Six-decimal rendering with trailing zeros and point trimmed (`5`, `0.5`).
pub fn format_number(value: f64) -> String {
    let text = format!("{value:.6}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

// ==================== Resolution helpers ====================

/// Follow typedef aliases until a non-typedef type is reached. Alias cycles stop
/// at the first repeated typedef.
pub fn effective_type<'a>(types: &'a Types, ty: &'a TypeRef) -> &'a TypeRef {
    let mut current = ty;
    let mut seen: HashSet<&'a str> = HashSet::new();
    while let TypeRef::User(name) = current {
        match types.get(name) {
            Some(UserType::Typedef(typedef)) if seen.insert(name.as_str()) => current = &typedef.ty,
            _ => break,
        }
    }
    current
}

/// The user type a name denotes once typedef aliases are followed; `None` when the
/// alias chain ends at a builtin or container, or the name is unknown.
pub fn effective_user_type<'a>(types: &'a Types, name: &str) -> Option<&'a UserType> {
    let user_type = types.get(name)?;
    match user_type {
        UserType::Typedef(typedef) => match effective_type(types, &typedef.ty) {
            TypeRef::User(target) => types.get(target),
            _ => None,
        },
        _ => Some(user_type),
    }
}

/// A base was reached twice while walking an inheritance graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircularBase;

/// Definitions with a base list and inherited items (struct members, enum values).
pub(crate) trait Inherited {
    type Item;
    fn name(&self) -> &str;
    fn bases(&self) -> &[String];
    fn items(&self) -> &[Self::Item];
    fn from_user_type(user_type: &UserType) -> Option<&Self>;
}

impl Inherited for Struct {
    type Item = Member;
    fn name(&self) -> &str {
        &self.name
    }
    fn bases(&self) -> &[String] {
        self.bases.as_deref().unwrap_or(&[])
    }
    fn items(&self) -> &[Member] {
        self.members.as_deref().unwrap_or(&[])
    }
    fn from_user_type(user_type: &UserType) -> Option<&Self> {
        user_type.as_struct()
    }
}

impl Inherited for Enum {
    type Item = EnumValue;
    fn name(&self) -> &str {
        &self.name
    }
    fn bases(&self) -> &[String] {
        self.bases.as_deref().unwrap_or(&[])
    }
    fn items(&self) -> &[EnumValue] {
        self.values.as_deref().unwrap_or(&[])
    }
    fn from_user_type(user_type: &UserType) -> Option<&Self> {
        user_type.as_enum()
    }
}

/// Depth-first walk: base items (in base order) before own items. Every base is
/// entered at most once per walk; reaching one again is reported as a cycle after
/// the items seen so far have been visited.
pub(crate) fn visit_inherited<'a, T: Inherited>(
    types: &'a Types,
    def: &'a T,
    visited: &mut HashSet<&'a str>,
    visit: &mut dyn FnMut(&'a T::Item),
) -> Result<(), CircularBase> {
    for base in def.bases() {
        let Some(base_def) = effective_user_type(types, base).and_then(T::from_user_type) else {
            continue;
        };
        if !visited.insert(base_def.name()) {
            return Err(CircularBase);
        }
        visit_inherited(types, base_def, visited, visit)?;
    }
    for item in def.items() {
        visit(item);
    }
    Ok(())
}

fn collect_inherited<'a, T: Inherited>(types: &'a Types, def: &'a T) -> Vec<&'a T::Item> {
    let mut items = Vec::new();
    let _ = visit_inherited(types, def, &mut HashSet::new(), &mut |item| items.push(item));
    items
}

/// Inherited-then-own members of a struct.
pub fn get_struct_members<'a>(types: &'a Types, s: &'a Struct) -> Vec<&'a Member> {
    collect_inherited(types, s)
}

/// Inherited-then-own values of an enum.
pub fn get_enum_values<'a>(types: &'a Types, e: &'a Enum) -> Vec<&'a EnumValue> {
    collect_inherited(types, e)
}

/// Every user type reachable from `type_name` through members, container element
/// and key types, base lists, typedef targets and action sections.
pub fn get_referenced_types<'a>(types: &'a Types, type_name: &'a str) -> Types {
    let mut referenced = Types::new();
    let mut pending: Vec<&'a str> = vec![type_name];
    while let Some(name) = pending.pop() {
        if referenced.contains_key(name) {
            continue;
        }
        let Some(user_type) = types.get(name) else {
            continue;
        };
        referenced.insert(name.to_string(), user_type.clone());
        match user_type {
            UserType::Struct(s) => {
                pending.extend(s.bases().iter().map(String::as_str));
                for member in s.items() {
                    push_type_names(&member.ty, &mut pending);
                }
            }
            UserType::Enum(e) => pending.extend(e.bases().iter().map(String::as_str)),
            UserType::Typedef(typedef) => push_type_names(&typedef.ty, &mut pending),
            UserType::Action(action) => pending.extend(
                ActionSection::ALL
                    .into_iter()
                    .filter_map(|section| action.section(section)),
            ),
        }
    }
    referenced
}

fn push_type_names<'a>(ty: &'a TypeRef, pending: &mut Vec<&'a str>) {
    match ty {
        TypeRef::Builtin(_) => {}
        TypeRef::User(name) => pending.push(name),
        TypeRef::Array(array) => push_type_names(&array.ty, pending),
        TypeRef::Dict(dict) => {
            push_type_names(&dict.ty, pending);
            if let Some(key_type) = &dict.key_type {
                push_type_names(key_type, pending);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_struct(name: &str, bases: &[&str], members: &[(&str, TypeRef)]) -> UserType {
        UserType::Struct(Struct {
            name: name.to_string(),
            bases: (!bases.is_empty()).then(|| bases.iter().map(|b| b.to_string()).collect()),
            members: Some(
                members
                    .iter()
                    .map(|(n, ty)| Member {
                        name: n.to_string(),
                        doc: None,
                        ty: ty.clone(),
                        attr: None,
                        optional: false,
                    })
                    .collect(),
            ),
            ..Default::default()
        })
    }

    #[test]
    fn format_number_trims() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(-1.25), "-1.25");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn type_ref_from_name() {
        assert_eq!(TypeRef::from_name("int"), TypeRef::Builtin(BuiltinType::Int));
        assert_eq!(TypeRef::from_name("any"), TypeRef::Builtin(BuiltinType::Any));
        assert_eq!(TypeRef::from_name("Foo"), TypeRef::User("Foo".to_string()));
    }

    #[test]
    fn inherited_members_come_first() {
        let mut types = Types::new();
        types.insert(
            "Base".into(),
            user_struct("Base", &[], &[("a", TypeRef::Builtin(BuiltinType::Int))]),
        );
        types.insert(
            "Derived".into(),
            user_struct("Derived", &["Base"], &[("b", TypeRef::Builtin(BuiltinType::Int))]),
        );
        let derived = types["Derived"].as_struct().unwrap();
        let names: Vec<_> = get_struct_members(&types, derived).iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn circular_walk_terminates() {
        let mut types = Types::new();
        types.insert("A".into(), user_struct("A", &["B"], &[]));
        types.insert("B".into(), user_struct("B", &["A"], &[]));
        let a = types["A"].as_struct().unwrap();
        let result = visit_inherited(&types, a, &mut HashSet::new(), &mut |_| {});
        assert_eq!(result, Err(CircularBase));
    }

    #[test]
    fn typedef_alias_cycle_terminates() {
        let mut types = Types::new();
        for (name, target) in [("A", "B"), ("B", "A")] {
            types.insert(
                name.into(),
                UserType::Typedef(Typedef {
                    name: name.into(),
                    doc: None,
                    doc_group: None,
                    ty: TypeRef::User(target.into()),
                    attr: None,
                }),
            );
        }
        let start = TypeRef::User("A".into());
        assert!(matches!(effective_type(&types, &start), TypeRef::User(_)));
    }

    #[test]
    fn referenced_types_follow_members_and_bases() {
        let mut types = Types::new();
        types.insert(
            "Root".into(),
            user_struct(
                "Root",
                &["Base"],
                &[(
                    "items",
                    TypeRef::Array(Box::new(ArrayType { ty: TypeRef::User("Item".into()), attr: None })),
                )],
            ),
        );
        types.insert("Base".into(), user_struct("Base", &[], &[]));
        types.insert(
            "Item".into(),
            user_struct("Item", &[], &[("root", TypeRef::User("Root".into()))]),
        );
        types.insert("Unused".into(), user_struct("Unused", &[], &[]));
        let referenced = get_referenced_types(&types, "Root");
        let names: Vec<_> = referenced.keys().map(String::as_str).collect();
        assert_eq!(names, ["Base", "Item", "Root"]);
    }
}
