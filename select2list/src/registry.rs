//! Instance registry and dispatcher.
//!
//! Each bound element gets exactly one [`SelectList`] for as long as the
//! registry lives. Entries are created on first bind and never replaced or
//! evicted; the caller owns the elements.

use std::collections::HashMap;

use serde_json::Value;

use crate::binding::Binding;
use crate::config::{ConfigOverrides, Options};
use crate::controller::{Outcome, SelectList};
use crate::method::Method;

/// What the entry point was asked to do.
pub enum Call<B: Binding> {
    /// Construct widgets on unbound elements.
    Bind(Options<B>),
    /// Run a named operation on bound elements.
    Invoke { name: String, args: Vec<Value> },
}

impl<B: Binding> Call<B> {
    pub fn invoke(name: impl Into<String>, args: Vec<Value>) -> Self {
        Call::Invoke {
            name: name.into(),
            args,
        }
    }
}

/// Return value of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a, N> {
    /// Exactly one operation ran; its outcome.
    Result(Outcome),
    /// Zero or several operations ran; the matched elements, for chaining.
    Matched(&'a [N]),
}

impl<'a, N> Dispatch<'a, N> {
    pub fn result(&self) -> Option<Outcome> {
        match self {
            Dispatch::Result(outcome) => Some(*outcome),
            Dispatch::Matched(_) => None,
        }
    }

    pub fn matched(&self) -> Option<&'a [N]> {
        match self {
            Dispatch::Result(_) => None,
            Dispatch::Matched(matched) => Some(*matched),
        }
    }
}

/// Maps bound elements to their widget and routes calls to them.
pub struct Registry<B: Binding> {
    binding: B,
    instances: HashMap<B::Node, SelectList<B>>,
}

impl<B: Binding> Registry<B> {
    pub fn new(binding: B) -> Self {
        Self {
            binding,
            instances: HashMap::new(),
        }
    }

    pub fn binding(&self) -> &B {
        &self.binding
    }

    /// The widget bound to `node`, if any.
    pub fn get(&self, node: &B::Node) -> Option<&SelectList<B>> {
        self.instances.get(node)
    }

    pub fn contains(&self, node: &B::Node) -> bool {
        self.instances.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Bind widgets to every unbound element of `matched`.
    pub fn bind<'a>(&mut self, matched: &'a [B::Node], options: Options<B>) -> &'a [B::Node] {
        self.dispatch(matched, Call::Bind(options));
        matched
    }

    /// Run operation `name` on every bound element of `matched`.
    pub fn invoke<'a>(
        &mut self,
        matched: &'a [B::Node],
        name: &str,
        args: &[Value],
    ) -> Dispatch<'a, B::Node> {
        self.dispatch(matched, Call::invoke(name, args.to_vec()))
    }

    /// Entry point for both binding and invocation.
    ///
    /// Elements are visited in order. A bound element receives the operation
    /// (unknown names are ignored, `Bind` is a no-op). An unbound element is
    /// bound instead, using the caller's options for `Bind` and defaults for
    /// `Invoke`; no operation runs on an element bound by the same call.
    pub fn dispatch<'a>(&mut self, matched: &'a [B::Node], call: Call<B>) -> Dispatch<'a, B::Node> {
        let (options, method) = match call {
            Call::Bind(options) => (options, None),
            Call::Invoke { name, args } => {
                let method = match Method::parse(&name, &args) {
                    Ok(Some(method)) => Some(Ok(method)),
                    Ok(None) => {
                        log::trace!("[dispatch] ignoring unknown method {:?}", name);
                        None
                    }
                    Err(e) => {
                        log::warn!("[dispatch] {}", e);
                        Some(Err(e))
                    }
                };
                (Options::default(), method)
            }
        };

        let mut results = Vec::new();
        let mut constructed: Vec<&B::Node> = Vec::new();
        for node in matched {
            if constructed.contains(&node) {
                continue;
            }
            match self.instances.get(node).cloned() {
                Some(list) => match &method {
                    Some(Ok(method)) => results.push(list.invoke(method.clone())),
                    Some(Err(_)) => results.push(Outcome::Ignored),
                    None => {}
                },
                None => {
                    self.construct(node, &options);
                    constructed.push(node);
                }
            }
        }

        if results.len() == 1 {
            Dispatch::Result(results[0])
        } else {
            Dispatch::Matched(matched)
        }
    }

    fn construct(&mut self, node: &B::Node, options: &Options<B>) {
        let data = match ConfigOverrides::from_data(&self.binding.data_map(node)) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("[dispatch] ignoring element overrides on {:?}: {}", node, e);
                ConfigOverrides::default()
            }
        };
        let config = options.resolve(data);
        log::debug!("[dispatch] binding {:?} with {:?}", node, config);

        let list = SelectList::new(
            self.binding.clone(),
            node.clone(),
            config,
            options.on_change.clone(),
        );
        self.instances.insert(node.clone(), list);
    }
}
