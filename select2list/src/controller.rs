//! The widget controller: selection, enablement and rendering for one bound
//! `select` element.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::binding::{Binding, EventResult};
use crate::config::{ChangeCallback, WidgetConfig};
use crate::method::Method;
use crate::options::{self, OptionSnapshot};
use crate::render;

/// Whether an operation changed anything.
///
/// Invalid input never fails; it is reported as `Ignored` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Ignored,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// Target of `enable` / `disable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Values {
    /// Every currently known value
    #[default]
    All,
    /// A single value. An empty value means `All`.
    One(String),
    Many(Vec<String>),
}

impl Values {
    fn resolve<N>(self, snapshot: &OptionSnapshot<N>) -> Vec<String> {
        match self {
            Values::All => snapshot.values(),
            Values::One(value) if value.is_empty() => snapshot.values(),
            Values::One(value) => vec![value],
            Values::Many(values) => values,
        }
    }
}

impl From<&str> for Values {
    fn from(value: &str) -> Self {
        Values::One(value.to_string())
    }
}

impl From<String> for Values {
    fn from(value: String) -> Self {
        Values::One(value)
    }
}

impl From<Option<&str>> for Values {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Values::All, Values::from)
    }
}

impl From<Vec<String>> for Values {
    fn from(values: Vec<String>) -> Self {
        Values::Many(values)
    }
}

impl From<&[&str]> for Values {
    fn from(values: &[&str]) -> Self {
        Values::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Values {
    fn from(values: [&str; N]) -> Self {
        Values::Many(values.iter().map(|v| v.to_string()).collect())
    }
}

struct State<N> {
    current: Option<String>,
    options: OptionSnapshot<N>,
}

struct Inner<B: Binding> {
    binding: B,
    source: B::Node,
    container: B::Node,
    config: WidgetConfig,
    on_change: Option<ChangeCallback<B>>,
    state: RefCell<State<B::Node>>,
    generation: Cell<u64>,
}

/// A `select` element rendered as a list of clickable items.
///
/// `SelectList` is a cheap handle; clones refer to the same widget. No
/// internal borrow is held while the change callback runs, so the callback
/// may call back into the widget. A callback that selects a different value
/// every time recurses without bound; breaking such cycles is up to the
/// caller.
pub struct SelectList<B: Binding> {
    inner: Rc<Inner<B>>,
}

impl<B: Binding> Clone for SelectList<B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<B: Binding> fmt::Debug for SelectList<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("SelectList")
            .field("source", &self.inner.source)
            .field("container", &self.inner.container)
            .field("current", &state.current)
            .field("options", &state.options.len())
            .finish()
    }
}

impl<B: Binding> SelectList<B> {
    /// Build the widget for `source`.
    ///
    /// Creates the list container, renders it, hides `source`, places the
    /// container right after it and starts listening for activations. The
    /// initial selection is the `value` attribute of the entry `source`
    /// reports as chosen; an entry without one leaves the selection unset.
    pub fn new(
        binding: B,
        source: B::Node,
        config: WidgetConfig,
        on_change: Option<ChangeCallback<B>>,
    ) -> Self {
        let current = binding
            .selected(&source)
            .and_then(|entry| binding.attr(&entry, "value"));
        let container = binding.create(&config.container_tag, &config.container_class);

        let list = Self {
            inner: Rc::new(Inner {
                binding,
                source,
                container,
                config,
                on_change,
                state: RefCell::new(State {
                    current,
                    options: OptionSnapshot::new(),
                }),
                generation: Cell::new(0),
            }),
        };

        list.redraw();

        let inner = &list.inner;
        inner.binding.hide(&inner.source);
        inner.binding.insert_after(&inner.source, &inner.container);

        // The binding owns the handler, so it only holds the widget weakly.
        let weak = Rc::downgrade(&list.inner);
        inner.binding.on_activate(
            &inner.container,
            &render::activator_selector(&inner.config),
            Rc::new(move |activator: &B::Node| match weak.upgrade() {
                Some(inner) => SelectList { inner }.activate(activator),
                None => EventResult::Ignored,
            }),
        );

        log::debug!(
            "[select2list] bound {:?} with {} options, current {:?}",
            inner.source,
            inner.state.borrow().options.len(),
            inner.state.borrow().current
        );
        list
    }

    // -------------------------------------------------------------------------
    // Read methods
    // -------------------------------------------------------------------------

    pub fn binding(&self) -> &B {
        &self.inner.binding
    }

    /// The backing `select` element.
    pub fn source(&self) -> &B::Node {
        &self.inner.source
    }

    /// The generated list element.
    pub fn container(&self) -> &B::Node {
        &self.inner.container
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.inner.config
    }

    pub fn current_value(&self) -> Option<String> {
        self.inner.state.borrow().current.clone()
    }

    /// Label of the current selection as of the last render.
    pub fn selected_label(&self) -> Option<String> {
        let state = self.inner.state.borrow();
        let current = state.current.as_deref()?;
        state.options.get(current).map(|o| o.label.clone())
    }

    /// A fresh snapshot of the backing source.
    pub fn options(&self) -> OptionSnapshot<B::Node> {
        options::parse(&self.inner.binding, &self.inner.source)
    }

    /// Number of renders performed so far.
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Run a named operation.
    pub fn invoke(&self, method: Method) -> Outcome {
        match method {
            Method::Redraw => self.redraw(),
            Method::Add {
                value,
                label,
                attributes,
            } => self.add(&value, label.as_deref(), &attributes),
            Method::Select(value) => self.select(&value),
            Method::Enable(values) => self.enable(values),
            Method::Disable(values) => self.disable(values),
        }
    }

    /// Re-read the source and rebuild the generated list.
    pub fn redraw(&self) -> Outcome {
        let inner = &self.inner;
        let snapshot = options::parse(&inner.binding, &inner.source);
        let current = inner.state.borrow().current.clone();

        render::render_items(
            &inner.binding,
            &inner.container,
            &inner.config,
            &snapshot,
            current.as_deref(),
        );

        inner.state.borrow_mut().options = snapshot;
        inner.generation.set(inner.generation.get() + 1);
        Outcome::Applied
    }

    /// Make `value` the current selection.
    ///
    /// Ignored unless `value` is non-empty, differs from the current
    /// selection and names an option of the source. On success the list is
    /// re-rendered, the value is written to the source and its change signal
    /// fired, and then the change callback runs once.
    pub fn select(&self, value: &str) -> Outcome {
        let inner = &self.inner;
        if value.is_empty() {
            log::trace!("[select2list] ignoring empty selection");
            return Outcome::Ignored;
        }

        let snapshot = options::parse(&inner.binding, &inner.source);
        {
            let mut state = inner.state.borrow_mut();
            let unchanged = state.current.as_deref() == Some(value);
            let known = snapshot.contains(value);
            state.options = snapshot;
            if unchanged || !known {
                log::trace!(
                    "[select2list] ignoring selection of {:?} (unchanged: {}, known: {})",
                    value,
                    unchanged,
                    known
                );
                return Outcome::Ignored;
            }
            state.current = Some(value.to_string());
        }

        self.redraw();

        inner.binding.set_value(&inner.source, value);
        inner.binding.trigger_change(&inner.source);

        let label = inner
            .state
            .borrow()
            .options
            .get(value)
            .map(|o| o.label.clone())
            .unwrap_or_default();
        log::debug!("[select2list] selected {:?} ({})", value, label);

        if let Some(on_change) = inner.on_change.clone() {
            on_change(self, value, &label);
        }
        Outcome::Applied
    }

    /// Append a new entry to the source and re-render. The label defaults to
    /// the value; the new entry is not selected.
    pub fn add(
        &self,
        value: &str,
        label: Option<&str>,
        attributes: &BTreeMap<String, String>,
    ) -> Outcome {
        let inner = &self.inner;
        let label = label.filter(|l| !l.is_empty()).unwrap_or(value);

        let entry = inner.binding.create("option", "");
        inner.binding.set_attr(&entry, "value", Some(value));
        inner.binding.set_text(&entry, label);
        inner.binding.append(&inner.source, &entry);
        for (name, attr) in attributes {
            inner.binding.set_attr(&entry, name, Some(attr));
        }

        log::debug!("[select2list] added option {:?}", value);
        self.redraw()
    }

    /// Clear the disabled flag of the given options.
    pub fn enable(&self, values: impl Into<Values>) -> Outcome {
        self.set_disabled(values.into(), false)
    }

    /// Set the disabled flag of the given options. Disabling the current
    /// selection does not deselect it.
    pub fn disable(&self, values: impl Into<Values>) -> Outcome {
        self.set_disabled(values.into(), true)
    }

    fn set_disabled(&self, values: Values, disabled: bool) -> Outcome {
        let inner = &self.inner;
        let snapshot = options::parse(&inner.binding, &inner.source);

        let mut touched = 0;
        for value in values.resolve(&snapshot) {
            match snapshot.get(&value) {
                Some(option) => {
                    inner.binding.set_attr(
                        &option.source,
                        "disabled",
                        disabled.then_some("disabled"),
                    );
                    touched += 1;
                }
                None => log::trace!("[select2list] skipping unknown value {:?}", value),
            }
        }

        self.redraw();
        if touched > 0 {
            Outcome::Applied
        } else {
            Outcome::Ignored
        }
    }

    fn activate(&self, activator: &B::Node) -> EventResult {
        let inner = &self.inner;
        let Some(item) = inner.binding.closest(activator, &inner.config.item_class) else {
            return EventResult::Ignored;
        };
        let value = inner
            .binding
            .data(&item, &inner.config.value_binding_key)
            .unwrap_or_default();
        self.select(&value);
        EventResult::Consumed
    }
}
