// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named property collections with style classes and change listeners.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::convert;
use crate::error::{ConvertError, ListenerError, PropertyError};
use crate::property::{Property, PropertyDefault};
use crate::value::{Convert, Value};

/// A computed-value transition for one property.
#[derive(Clone, Debug, PartialEq)]
pub struct Change {
    /// The property (or synthetic event) name.
    pub name: String,
    /// The previous computed value.
    pub old: Value,
    /// The new computed value.
    pub new: Value,
}

impl Change {
    /// Creates a change record.
    #[must_use]
    pub fn new(name: impl Into<String>, old: Value, new: Value) -> Self {
        Self {
            name: name.into(),
            old,
            new,
        }
    }

    /// Creates a synthetic event with no value transition, such as `click`.
    #[must_use]
    pub fn event(name: impl Into<String>) -> Self {
        Self::new(name, Value::Null, Value::Null)
    }
}

/// A batch of changes from one mutation. Rect composites touch four slots,
/// which bounds the common case.
pub type Changes = SmallVec<[Change; 4]>;

/// A named bundle of property values, applied to sets as a unit.
///
/// Entry names may be plain (`"width"`), composite (`"margin"`, distributed
/// over the parts), or state-qualified (`"backgroundColor#down"`, consulted
/// only while the owner is in that state).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyleClass {
    name: String,
    entries: Vec<(String, Value)>,
}

impl StyleClass {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds an entry, builder style. Later entries for the same name win
    /// within this class.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, value.into()));
        self
    }

    /// The class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v))
    }

    /// All entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }
}

/// A change listener. Returning an error aborts delivery for the event;
/// later listeners do not run and the error surfaces to the mutating caller.
pub type Listener = Box<dyn FnMut(&Change) -> Result<(), ListenerError>>;

/// A collection of named properties with composite registration, style
/// classes, and per-name change listeners.
///
/// The schema is lenient: reading or writing a name that was never
/// registered auto-vivifies an untyped, inheriting property with a `Null`
/// default. Registration (`add_property` and friends) refines a name with
/// a default, converter, and inheritance flag without losing an explicit
/// value that was set before registration.
pub struct PropertySet {
    id: String,
    props: HashMap<String, Property>,
    composites: HashMap<String, Vec<String>>,
    manual_classes: Vec<StyleClass>,
    auto_classes: Vec<StyleClass>,
    listeners: HashMap<String, Vec<Listener>>,
}

impl PropertySet {
    /// Creates an empty set with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            props: HashMap::new(),
            composites: HashMap::new(),
            manual_classes: Vec::new(),
            auto_classes: Vec::new(),
            listeners: HashMap::new(),
        }
    }

    /// The set id, used for selector matching.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Registers (or re-registers) a plain property. An explicit value set
    /// before registration is preserved; no change events are produced.
    ///
    /// # Errors
    ///
    /// Returns a conversion error if a previously attached class value or a
    /// preserved explicit value fails the new converter.
    pub fn add_property(
        &mut self,
        name: &str,
        default: impl Into<PropertyDefault>,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), ConvertError> {
        let mut prop = Property::new(name, default, convert, inherit);
        prop.set_class_value(self.class_value_for(name))?;
        if let Some(existing) = self.props.get(name) {
            let explicit = existing.explicit().clone();
            if !explicit.is_null() {
                prop.set_value(explicit)?;
            }
        }
        self.props.insert(String::from(name), prop);
        Ok(())
    }

    /// Registers a composite property distributing over `parts`, each part
    /// becoming a plain property sharing the converter and inheritance
    /// flag. The default is distributed with [`convert::spread`].
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::DuplicateComposite`] if the name is already
    /// a plain property or composite, or a conversion error from a part.
    pub fn add_composite(
        &mut self,
        name: &str,
        parts: Vec<String>,
        default: Value,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), PropertyError> {
        if self.props.contains_key(name) || self.composites.contains_key(name) {
            return Err(PropertyError::DuplicateComposite(String::from(name)));
        }
        let defaults = convert::spread(&default, parts.len());
        for (part, part_default) in parts.iter().zip(defaults) {
            self.add_property(part, part_default, convert, inherit)?;
        }
        self.composites.insert(String::from(name), parts);
        Ok(())
    }

    /// Registers a rect composite with `Left`/`Top`/`Right`/`Bottom` parts.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PropertySet::add_composite`].
    pub fn add_rect_property(
        &mut self,
        name: &str,
        default: Value,
        convert: Option<Convert>,
        inherit: bool,
    ) -> Result<(), PropertyError> {
        let parts = convert::rect_part_names(name).into_iter().collect();
        self.add_composite(name, parts, default, convert, inherit)
    }

    /// Whether a plain property or composite with this name exists.
    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.props.contains_key(name) || self.composites.contains_key(name)
    }

    /// The registered parts of a composite, if `name` is one.
    #[must_use]
    pub fn composite_parts(&self, name: &str) -> Option<&[String]> {
        self.composites.get(name).map(Vec::as_slice)
    }

    /// Direct access to a plain property.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.props.get(name)
    }

    /// Names of all plain properties, in no particular order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    /// The computed value for a name, auto-vivifying unknown names.
    /// Composites read as a [`Value::List`] of their part values.
    #[must_use]
    pub fn value(&mut self, name: &str) -> Value {
        if let Some(parts) = self.composites.get(name).cloned() {
            let items = parts.iter().map(|part| self.value(part)).collect();
            return Value::List(items);
        }
        self.ensure(name);
        self.props
            .get(name)
            .map(|p| p.value().clone())
            .unwrap_or_default()
    }

    /// The computed value for a name without vivifying, or `None` if the
    /// name is unknown.
    #[must_use]
    pub fn try_value(&self, name: &str) -> Option<Value> {
        if let Some(parts) = self.composites.get(name) {
            let items = parts
                .iter()
                .map(|part| {
                    self.props
                        .get(part)
                        .map(|p| p.value().clone())
                        .unwrap_or_default()
                })
                .collect();
            return Some(Value::List(items));
        }
        self.props.get(name).map(|p| p.value().clone())
    }

    /// Sets the explicit value for a name. Composites distribute over
    /// their parts; unknown names vivify.
    ///
    /// # Errors
    ///
    /// Returns the converter's error; earlier parts of a composite keep
    /// their already-applied values.
    pub fn set(&mut self, name: &str, value: Value) -> Result<Changes, ConvertError> {
        let mut changes = Changes::new();
        if let Some(parts) = self.composites.get(name).cloned() {
            let values = convert::spread(&value, parts.len());
            for (part, part_value) in parts.iter().zip(values) {
                if let Some(change) = self.set_plain(part, part_value)? {
                    changes.push(change);
                }
            }
        } else if let Some(change) = self.set_plain(name, value)? {
            changes.push(change);
        }
        Ok(changes)
    }

    /// Replaces the default for a name, composite-aware.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails.
    pub fn set_default(&mut self, name: &str, default: Value) -> Result<Changes, ConvertError> {
        let mut changes = Changes::new();
        if let Some(parts) = self.composites.get(name).cloned() {
            let defaults = convert::spread(&default, parts.len());
            for (part, part_default) in parts.iter().zip(defaults) {
                self.ensure(part);
                if let Some(prop) = self.props.get_mut(part)
                    && let Some((old, new)) = prop.set_default(part_default)?
                {
                    changes.push(Change::new(part.as_str(), old, new));
                }
            }
        } else {
            self.ensure(name);
            if let Some(prop) = self.props.get_mut(name)
                && let Some((old, new)) = prop.set_default(default)?
            {
                changes.push(Change::new(name, old, new));
            }
        }
        Ok(changes)
    }

    /// Overrides the inheritance flag for a name, composite-aware.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if the newly resolved value fails.
    pub fn set_inherit(&mut self, name: &str, inherit: bool) -> Result<Changes, ConvertError> {
        let mut changes = Changes::new();
        let parts = self
            .composites
            .get(name)
            .cloned()
            .unwrap_or_else(|| alloc::vec![String::from(name)]);
        for part in &parts {
            self.ensure(part);
            if let Some(prop) = self.props.get_mut(part)
                && let Some((old, new)) = prop.set_inherit(inherit)?
            {
                changes.push(Change::new(part.as_str(), old, new));
            }
        }
        Ok(changes)
    }

    /// Writes the inherited slot of a plain property with a value already
    /// converted by the parent. Vivifies unknown names so inheritance can
    /// land before local registration.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if re-conversion fails.
    pub fn set_inherited(
        &mut self,
        name: &str,
        value: Value,
    ) -> Result<Option<Change>, ConvertError> {
        self.ensure(name);
        let Some(prop) = self.props.get_mut(name) else {
            return Ok(None);
        };
        Ok(prop
            .set_inherited(value)?
            .map(|(old, new)| Change::new(name, old, new)))
    }

    /// Registers a listener for a property name or synthetic event name.
    pub fn add_listener(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&Change) -> Result<(), ListenerError> + 'static,
    ) {
        self.listeners
            .entry(event.into())
            .or_default()
            .push(Box::new(listener));
    }

    /// Delivers a change to its listeners in registration order.
    ///
    /// While dispatching, the named property is marked updating so a
    /// listener writing the same property back cannot re-enter dispatch.
    ///
    /// # Errors
    ///
    /// Returns the first listener's error; later listeners do not run.
    pub fn fire(&mut self, change: &Change) -> Result<(), ListenerError> {
        if let Some(prop) = self.props.get_mut(&change.name) {
            prop.set_updating(true);
        }
        let mut result = Ok(());
        if let Some(list) = self.listeners.get_mut(&change.name) {
            for listener in list.iter_mut() {
                if let Err(err) = listener(change) {
                    result = Err(err);
                    break;
                }
            }
        }
        if let Some(prop) = self.props.get_mut(&change.name) {
            prop.set_updating(false);
        }
        result
    }

    /// Attaches a manual style class. Re-attaching a class with the same
    /// name replaces the previous attachment in place.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if a class entry fails conversion.
    pub fn attach_class(&mut self, class: StyleClass) -> Result<Changes, ConvertError> {
        self.manual_classes.retain(|c| c.name() != class.name());
        self.manual_classes.push(class);
        self.refresh_class_values()
    }

    /// Detaches a previously attached manual class.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::ClassNotAttached`] if no manual class with
    /// this name is attached.
    pub fn detach_class(&mut self, name: &str) -> Result<Changes, PropertyError> {
        let Some(index) = self.manual_classes.iter().position(|c| c.name() == name) else {
            return Err(PropertyError::ClassNotAttached(String::from(name)));
        };
        self.manual_classes.remove(index);
        Ok(self.refresh_class_values()?)
    }

    /// Replaces the managed (selector-derived) classes. Manual classes
    /// always outrank these.
    ///
    /// # Errors
    ///
    /// Returns the converter's error if a class entry fails conversion.
    pub fn set_auto_classes(&mut self, classes: Vec<StyleClass>) -> Result<Changes, ConvertError> {
        self.auto_classes = classes;
        self.refresh_class_values()
    }

    /// Names of attached manual classes, in attachment order.
    pub fn class_names(&self) -> impl Iterator<Item = &str> {
        self.manual_classes.iter().map(StyleClass::name)
    }

    fn ensure(&mut self, name: &str) {
        if self.props.contains_key(name) || self.composites.contains_key(name) {
            return;
        }
        let mut prop = Property::new(name, Value::Null, None, true);
        // No converter on a vivified property, so this cannot fail.
        let _ = prop.set_class_value(self.class_value_for(name));
        self.props.insert(String::from(name), prop);
    }

    fn set_plain(&mut self, name: &str, value: Value) -> Result<Option<Change>, ConvertError> {
        self.ensure(name);
        let Some(prop) = self.props.get_mut(name) else {
            return Ok(None);
        };
        Ok(prop
            .set_value(value)?
            .map(|(old, new)| Change::new(name, old, new)))
    }

    /// Recomputes every property's class slot from the attached classes,
    /// manual first, then auto, first provider winning per name.
    fn refresh_class_values(&mut self) -> Result<Changes, ConvertError> {
        // Vivify the target of every plain class entry so the cascade has
        // a slot to land in. Composite-named entries land in their parts,
        // which registration already created.
        let entry_names: Vec<String> = self
            .manual_classes
            .iter()
            .chain(self.auto_classes.iter())
            .flat_map(|class| class.entries().iter().map(|(n, _)| n.clone()))
            .collect();
        for name in entry_names {
            if !self.composites.contains_key(&name) {
                self.ensure(&name);
            }
        }

        let mut changes = Changes::new();
        let names: Vec<String> = self.props.keys().cloned().collect();
        for name in names {
            let class_value = self.class_value_for(&name);
            if let Some(prop) = self.props.get_mut(&name)
                && let Some((old, new)) = prop.set_class_value(class_value)?
            {
                changes.push(Change::new(name, old, new));
            }
        }
        Ok(changes)
    }

    /// The class-layer value for a plain property name: the first attached
    /// class (manual before auto) providing either the name directly or,
    /// for a composite part, the composite name distributed over its parts.
    fn class_value_for(&self, name: &str) -> Value {
        let part_of = self.composites.iter().find_map(|(composite, parts)| {
            parts
                .iter()
                .position(|p| p == name)
                .map(|index| (composite.as_str(), index, parts.len()))
        });
        for class in self.manual_classes.iter().chain(self.auto_classes.iter()) {
            if let Some(value) = class.get(name) {
                return value.clone();
            }
            if let Some((composite, index, count)) = part_of
                && let Some(value) = class.get(composite)
            {
                return convert::spread(value, count)
                    .into_iter()
                    .nth(index)
                    .unwrap_or_default();
            }
        }
        Value::Null
    }
}

impl core::fmt::Debug for PropertySet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertySet")
            .field("id", &self.id)
            .field("props", &self.props)
            .field("composites", &self.composites)
            .field("manual_classes", &self.manual_classes)
            .field("auto_classes", &self.auto_classes)
            .field("listeners", &self.listeners.keys())
            .finish()
    }
}
