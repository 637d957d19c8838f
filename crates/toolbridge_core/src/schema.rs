//! Canonical, dialect-neutral tool schema.
//!
//! Parameter trees live in an index-based arena: nodes are stored in a
//! vector and children refer to each other by [`NodeId`]. A tree built
//! through the arena API may contain cycles; [`CanonicalSchema::normalize`]
//! rejects them. Equality is structural over the tree reachable from the
//! root, never over arena layout.

use crate::diagnostic::FieldPath;
use crate::error::{SchemaError, SchemaResult};
use indexmap::{IndexMap, IndexSet};
use serde_json::{Number, Value};
use std::fmt;

/// Numeric bound, kept in its source representation
pub type Bound = Number;

/// Check `name` against `[A-Za-z_][A-Za-z0-9_]*`
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Index of a node inside a [`ParamArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position in the arena
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameter type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// `object`
    Object,
    /// `array`
    Array,
    /// `null`
    Null,
}

impl Kind {
    /// Every kind
    pub const ALL: [Kind; 7] = [
        Self::String,
        Self::Number,
        Self::Integer,
        Self::Boolean,
        Self::Object,
        Self::Array,
        Self::Null,
    ];

    /// JSON-schema type name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
            Self::Null => "null",
        }
    }

    /// Parse a JSON-schema type name
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Object or array
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload of a parameter node
#[derive(Debug, Clone)]
pub enum ParamKind {
    /// Free text
    String,
    /// Floating point number
    Number {
        /// Inclusive lower bound
        minimum: Option<Bound>,
        /// Inclusive upper bound
        maximum: Option<Bound>,
    },
    /// Whole number
    Integer {
        /// Inclusive lower bound
        minimum: Option<Bound>,
        /// Inclusive upper bound
        maximum: Option<Bound>,
    },
    /// `true` or `false`
    Boolean,
    /// Named properties
    Object {
        /// Properties in insertion order
        properties: IndexMap<String, NodeId>,
        /// Names of mandatory properties
        required: IndexSet<String>,
        /// Which optional keywords the node spells out
        spelling: ObjectSpelling,
    },
    /// Homogeneous list
    Array {
        /// Item schema
        items: NodeId,
    },
    /// JSON `null`
    Null,
}

impl ParamKind {
    /// Empty object payload
    #[must_use]
    pub fn object() -> Self {
        Self::Object {
            properties: IndexMap::new(),
            required: IndexSet::new(),
            spelling: ObjectSpelling::default(),
        }
    }

    /// Type tag of the payload
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Self::String => Kind::String,
            Self::Number { .. } => Kind::Number,
            Self::Integer { .. } => Kind::Integer,
            Self::Boolean => Kind::Boolean,
            Self::Object { .. } => Kind::Object,
            Self::Array { .. } => Kind::Array,
            Self::Null => Kind::Null,
        }
    }

    /// Bounds when both are present and `minimum > maximum`
    #[must_use]
    pub fn inverted_bounds(&self) -> Option<(&Bound, &Bound)> {
        match self {
            Self::Number {
                minimum: Some(min),
                maximum: Some(max),
            }
            | Self::Integer {
                minimum: Some(min),
                maximum: Some(max),
            } if bound_gt(min, max) => Some((min, max)),
            _ => None,
        }
    }
}

/// `a > b`, exact for integers and through `f64` when either is a float
fn bound_gt(a: &Bound, b: &Bound) -> bool {
    if a.is_f64() || b.is_f64() {
        return matches!((a.as_f64(), b.as_f64()), (Some(a), Some(b)) if a > b);
    }
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a > b;
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a > b;
    }
    // one is above i64::MAX and the other is negative
    a.as_u64().is_some()
}

/// Whether an object node writes keywords that may be left out.
///
/// A node built through the API writes `properties` always and `required`
/// only when it is non-empty; a decoded node records what its source wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSpelling {
    /// Write `properties` even when empty
    pub properties: bool,
    /// Write `required` even when empty
    pub required: bool,
}

impl Default for ObjectSpelling {
    fn default() -> Self {
        Self {
            properties: true,
            required: false,
        }
    }
}

impl ObjectSpelling {
    /// Whether `properties` is written for a node with `count` properties
    #[must_use]
    pub fn writes_properties(&self, count: usize) -> bool {
        self.properties || count > 0
    }

    /// Whether `required` is written for a node with `count` required names
    #[must_use]
    pub fn writes_required(&self, count: usize) -> bool {
        self.required || count > 0
    }
}

/// One node of a parameter tree
#[derive(Debug, Clone)]
pub struct ParamNode {
    /// Type and type-specific payload
    pub kind: ParamKind,
    /// Optional human-readable description
    pub description: Option<String>,
    /// Allowed literals, in order
    pub enum_values: Option<Vec<Value>>,
    /// JSON-schema keywords without a canonical slot, kept verbatim
    pub extensions: IndexMap<String, Value>,
}

impl ParamNode {
    /// Create a node of the given kind
    #[must_use]
    pub fn new(kind: ParamKind) -> Self {
        Self {
            kind,
            description: None,
            enum_values: None,
            extensions: IndexMap::new(),
        }
    }

    /// A string node
    #[must_use]
    pub fn string() -> Self {
        Self::new(ParamKind::String)
    }

    /// A number node without bounds
    #[must_use]
    pub fn number() -> Self {
        Self::new(ParamKind::Number {
            minimum: None,
            maximum: None,
        })
    }

    /// An integer node without bounds
    #[must_use]
    pub fn integer() -> Self {
        Self::new(ParamKind::Integer {
            minimum: None,
            maximum: None,
        })
    }

    /// A boolean node
    #[must_use]
    pub fn boolean() -> Self {
        Self::new(ParamKind::Boolean)
    }

    /// An empty object node
    #[must_use]
    pub fn object() -> Self {
        Self::new(ParamKind::object())
    }

    /// An array node over `items`
    #[must_use]
    pub fn array(items: NodeId) -> Self {
        Self::new(ParamKind::Array { items })
    }

    /// A null node
    #[must_use]
    pub fn null() -> Self {
        Self::new(ParamKind::Null)
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the allowed literals
    #[must_use]
    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// Set numeric bounds; ignored for non-numeric kinds
    #[must_use]
    pub fn with_bounds(mut self, min: Option<Bound>, max: Option<Bound>) -> Self {
        if let ParamKind::Number { minimum, maximum } | ParamKind::Integer { minimum, maximum } =
            &mut self.kind
        {
            *minimum = min;
            *maximum = max;
        }
        self
    }

    /// Keep an extra JSON-schema keyword
    #[must_use]
    pub fn with_extension(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extensions.insert(key.into(), value);
        self
    }

    /// Type tag of the node
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind.kind()
    }
}

/// Vector-backed storage for parameter nodes
#[derive(Debug, Clone, Default)]
pub struct ParamArena {
    nodes: Vec<ParamNode>,
}

impl ParamArena {
    /// Create an empty arena
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Store a node and return its id
    pub fn push(&mut self, node: ParamNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Get a node
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&ParamNode> {
        self.nodes.get(id.0)
    }

    /// Get a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ParamNode> {
        self.nodes.get_mut(id.0)
    }

    /// Number of stored nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Attach `child` as property `name` of `object`
    ///
    /// # Errors
    ///
    /// Returns error if either id is dangling or `object` is not an object
    pub fn add_property(
        &mut self,
        object: NodeId,
        name: impl Into<String>,
        child: NodeId,
    ) -> SchemaResult<()> {
        self.ensure_exists(child)?;
        match self.object_payload(object)? {
            ParamKind::Object { properties, .. } => {
                properties.insert(name.into(), child);
                Ok(())
            }
            _ => unreachable_kind(object),
        }
    }

    /// Mark property `name` of `object` as required
    ///
    /// # Errors
    ///
    /// Returns error if `object` is dangling or not an object
    pub fn require(&mut self, object: NodeId, name: impl Into<String>) -> SchemaResult<()> {
        match self.object_payload(object)? {
            ParamKind::Object { required, .. } => {
                required.insert(name.into());
                Ok(())
            }
            _ => unreachable_kind(object),
        }
    }

    /// Point the item schema of `array` at `items`
    ///
    /// # Errors
    ///
    /// Returns error if either id is dangling or `array` is not an array
    pub fn set_items(&mut self, array: NodeId, items: NodeId) -> SchemaResult<()> {
        self.ensure_exists(items)?;
        let node = self.nodes.get_mut(array.0).ok_or_else(|| dangling(array))?;
        match &mut node.kind {
            ParamKind::Array { items: slot } => {
                *slot = items;
                Ok(())
            }
            other => Err(SchemaError::invalid(
                FieldPath::root(&array.to_string()),
                format!("expected array node, found {}", other.kind()),
            )),
        }
    }

    fn ensure_exists(&self, id: NodeId) -> SchemaResult<()> {
        self.get(id).map(|_| ()).ok_or_else(|| dangling(id))
    }

    fn object_payload(&mut self, id: NodeId) -> SchemaResult<&mut ParamKind> {
        let node = self.nodes.get_mut(id.0).ok_or_else(|| dangling(id))?;
        match node.kind {
            ParamKind::Object { .. } => Ok(&mut node.kind),
            ref other => Err(SchemaError::invalid(
                FieldPath::root(&id.to_string()),
                format!("expected object node, found {}", other.kind()),
            )),
        }
    }
}

fn dangling(id: NodeId) -> SchemaError {
    SchemaError::invalid(
        FieldPath::root(&id.to_string()),
        format!("dangling node reference {id}"),
    )
}

fn unreachable_kind(id: NodeId) -> SchemaResult<()> {
    Err(SchemaError::invalid(
        FieldPath::root(&id.to_string()),
        "expected object node",
    ))
}

/// Event produced by [`CanonicalSchema::walk`]
#[derive(Debug, Clone, Copy)]
pub enum Visit<'a> {
    /// A node reached for the first time on the current path
    Node {
        /// Canonical path of the node
        path: &'a FieldPath,
        /// Arena id
        id: NodeId,
        /// The node itself
        node: &'a ParamNode,
        /// 0 for the parameters root, 1 for its properties, ...
        depth: usize,
    },
    /// A reference back to an ancestor; not descended
    Cycle {
        /// Path of the referencing slot
        path: &'a FieldPath,
    },
    /// A reference to a node the arena does not hold
    Dangling {
        /// Path of the referencing slot
        path: &'a FieldPath,
    },
}

/// Dialect-neutral tool definition
#[derive(Debug, Clone)]
pub struct CanonicalSchema {
    /// Tool name
    pub name: String,
    /// Tool description; `None` when the source left it out
    pub description: Option<String>,
    arena: ParamArena,
    root: NodeId,
}

impl CanonicalSchema {
    /// Assemble a schema from an arena and the id of its parameters node
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        arena: ParamArena,
        root: NodeId,
    ) -> Self {
        Self {
            name: name.into(),
            description,
            arena,
            root,
        }
    }

    /// A schema whose parameters are an empty object
    #[must_use]
    pub fn empty(name: impl Into<String>, description: impl Into<String>) -> Self {
        let mut arena = ParamArena::new();
        let root = arena.push(ParamNode::object());
        Self::new(name, Some(description.into()), arena, root)
    }

    /// Description text, empty when absent
    #[must_use]
    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Id of the parameters node
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Node storage
    #[must_use]
    pub fn arena(&self) -> &ParamArena {
        &self.arena
    }

    /// Node storage, mutably
    pub fn arena_mut(&mut self) -> &mut ParamArena {
        &mut self.arena
    }

    /// Get a node by id
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&ParamNode> {
        self.arena.get(id)
    }

    /// The parameters node
    #[must_use]
    pub fn parameters(&self) -> Option<&ParamNode> {
        self.arena.get(self.root)
    }

    /// Top-level properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&str, NodeId)> + '_ {
        let properties = match self.parameters().map(|node| &node.kind) {
            Some(ParamKind::Object { properties, .. }) => Some(properties),
            _ => None,
        };
        properties
            .into_iter()
            .flat_map(|props| props.iter().map(|(name, id)| (name.as_str(), *id)))
    }

    /// Whether a top-level property is required
    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        matches!(
            self.parameters().map(|node| &node.kind),
            Some(ParamKind::Object { required, .. }) if required.contains(name)
        )
    }

    /// Store `node` and attach it as a top-level property
    ///
    /// # Errors
    ///
    /// Returns error if the parameters node is not an object
    pub fn add_property(
        &mut self,
        name: impl Into<String>,
        node: ParamNode,
        required: bool,
    ) -> SchemaResult<NodeId> {
        let name = name.into();
        let id = self.arena.push(node);
        self.arena.add_property(self.root, name.clone(), id)?;
        if required {
            self.arena.require(self.root, name)?;
        }
        Ok(id)
    }

    /// Enforce canonical invariants and compact the arena.
    ///
    /// The walk is depth-first with a visited set scoped to the current
    /// root-to-node path, so a subtree reused by two siblings is accepted
    /// while a node that points back at one of its ancestors is not.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Cycle`] for self-referential trees and
    /// [`SchemaError::InvalidStructure`] for a bad name, a non-object root,
    /// a `required` entry without a property, inverted bounds, or a
    /// dangling node reference.
    pub fn normalize(self) -> SchemaResult<Self> {
        if !is_identifier(&self.name) {
            return Err(SchemaError::invalid(
                FieldPath::root("name"),
                format!(
                    "tool name '{}' must match [A-Za-z_][A-Za-z0-9_]*",
                    self.name
                ),
            ));
        }

        let path = FieldPath::parameters();
        match self.parameters() {
            None => return Err(dangling(self.root)),
            Some(node) if node.kind() != Kind::Object => {
                return Err(SchemaError::invalid(
                    path,
                    format!("parameters must be an object, found {}", node.kind()),
                ));
            }
            Some(_) => {}
        }

        let mut compact = ParamArena::new();
        let mut on_path = IndexSet::new();
        let root = self.copy_checked(self.root, &path, &mut on_path, &mut compact)?;

        Ok(Self {
            name: self.name,
            description: self.description,
            arena: compact,
            root,
        })
    }

    fn copy_checked(
        &self,
        id: NodeId,
        path: &FieldPath,
        on_path: &mut IndexSet<NodeId>,
        out: &mut ParamArena,
    ) -> SchemaResult<NodeId> {
        if on_path.contains(&id) {
            return Err(SchemaError::Cycle { path: path.clone() });
        }
        let node = self.arena.get(id).ok_or_else(|| {
            SchemaError::invalid(path.clone(), format!("dangling node reference {id}"))
        })?;

        if let Some((min, max)) = node.kind.inverted_bounds() {
            return Err(SchemaError::invalid(
                path.clone(),
                format!("minimum {min} exceeds maximum {max}"),
            ));
        }

        // Pre-order: reserve the slot before copying children.
        let slot = out.push(ParamNode {
            kind: ParamKind::Null,
            ..node.clone()
        });
        on_path.insert(id);

        let kind = match &node.kind {
            ParamKind::Object {
                properties,
                required,
                spelling,
            } => {
                for (index, name) in required.iter().enumerate() {
                    if !properties.contains_key(name) {
                        return Err(SchemaError::invalid(
                            path.required(index),
                            format!("required property '{name}' is not defined in properties"),
                        ));
                    }
                }
                let mut copied = IndexMap::with_capacity(properties.len());
                for (name, child) in properties {
                    let child = self.copy_checked(*child, &path.property(name), on_path, out)?;
                    copied.insert(name.clone(), child);
                }
                ParamKind::Object {
                    properties: copied,
                    required: required.clone(),
                    spelling: *spelling,
                }
            }
            ParamKind::Array { items } => ParamKind::Array {
                items: self.copy_checked(*items, &path.items(), on_path, out)?,
            },
            other => other.clone(),
        };

        on_path.pop();
        if let Some(copy) = out.get_mut(slot) {
            copy.kind = kind;
        }
        Ok(slot)
    }

    /// Visit the tree in pre-order.
    ///
    /// Cycle-safe: a reference to an ancestor produces [`Visit::Cycle`]
    /// and is not followed.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(Visit<'_>),
    {
        let mut on_path = IndexSet::new();
        self.walk_node(
            self.root,
            &FieldPath::parameters(),
            0,
            &mut on_path,
            &mut visit,
        );
    }

    fn walk_node<F>(
        &self,
        id: NodeId,
        path: &FieldPath,
        depth: usize,
        on_path: &mut IndexSet<NodeId>,
        visit: &mut F,
    ) where
        F: FnMut(Visit<'_>),
    {
        if on_path.contains(&id) {
            visit(Visit::Cycle { path });
            return;
        }
        let Some(node) = self.arena.get(id) else {
            visit(Visit::Dangling { path });
            return;
        };

        visit(Visit::Node {
            path,
            id,
            node,
            depth,
        });

        on_path.insert(id);
        match &node.kind {
            ParamKind::Object { properties, .. } => {
                for (name, child) in properties {
                    self.walk_node(*child, &path.property(name), depth + 1, on_path, visit);
                }
            }
            ParamKind::Array { items } => {
                self.walk_node(*items, &path.items(), depth + 1, on_path, visit);
            }
            _ => {}
        }
        on_path.pop();
    }
}

impl PartialEq for CanonicalSchema {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && nodes_equal(
                &self.arena,
                self.root,
                &other.arena,
                other.root,
                &mut Vec::new(),
            )
    }
}

/// Deep comparison of two subtrees. Pairs already on the comparison path
/// compare equal, which keeps the walk finite on cyclic input.
fn nodes_equal(
    left_arena: &ParamArena,
    left: NodeId,
    right_arena: &ParamArena,
    right: NodeId,
    path: &mut Vec<(NodeId, NodeId)>,
) -> bool {
    if path.contains(&(left, right)) {
        return true;
    }
    let (Some(a), Some(b)) = (left_arena.get(left), right_arena.get(right)) else {
        return false;
    };
    if a.description != b.description
        || a.enum_values != b.enum_values
        || a.extensions != b.extensions
    {
        return false;
    }

    path.push((left, right));
    let equal = match (&a.kind, &b.kind) {
        (ParamKind::String, ParamKind::String)
        | (ParamKind::Boolean, ParamKind::Boolean)
        | (ParamKind::Null, ParamKind::Null) => true,
        (
            ParamKind::Number {
                minimum: min_a,
                maximum: max_a,
            },
            ParamKind::Number {
                minimum: min_b,
                maximum: max_b,
            },
        )
        | (
            ParamKind::Integer {
                minimum: min_a,
                maximum: max_a,
            },
            ParamKind::Integer {
                minimum: min_b,
                maximum: max_b,
            },
        ) => min_a == min_b && max_a == max_b,
        (
            ParamKind::Object {
                properties: props_a,
                required: req_a,
                spelling: spelling_a,
            },
            ParamKind::Object {
                properties: props_b,
                required: req_b,
                spelling: spelling_b,
            },
        ) => {
            req_a == req_b
                && spelling_a.writes_properties(props_a.len())
                    == spelling_b.writes_properties(props_b.len())
                && spelling_a.writes_required(req_a.len())
                    == spelling_b.writes_required(req_b.len())
                && props_a.len() == props_b.len()
                && props_a.iter().all(|(name, child_a)| {
                    props_b.get(name).is_some_and(|child_b| {
                        nodes_equal(left_arena, *child_a, right_arena, *child_b, path)
                    })
                })
        }
        (ParamKind::Array { items: items_a }, ParamKind::Array { items: items_b }) => {
            nodes_equal(left_arena, *items_a, right_arena, *items_b, path)
        }
        _ => false,
    };
    path.pop();
    equal
}
