//! Builds the generated list from a snapshot.

use crate::binding::Binding;
use crate::config::WidgetConfig;
use crate::options::{OptionSnapshot, SelectOption};

/// Class added to the item of the current selection.
pub const SELECTED_CLASS: &str = "selected";
/// Class added to items of disabled options.
pub const DISABLED_CLASS: &str = "disabled";

/// How an option is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// The current selection: plain text, `selected` marker
    Selected,
    /// Disabled: plain text, `disabled` marker
    Disabled,
    /// Anything else: an anchor that activates the option
    Interactive,
}

impl ItemState {
    pub fn of<N>(option: &SelectOption<N>, current: Option<&str>) -> Self {
        if current == Some(option.value.as_str()) {
            ItemState::Selected
        } else if option.disabled {
            ItemState::Disabled
        } else {
            ItemState::Interactive
        }
    }

    fn marker(self) -> Option<&'static str> {
        match self {
            ItemState::Selected => Some(SELECTED_CLASS),
            ItemState::Disabled => Some(DISABLED_CLASS),
            ItemState::Interactive => None,
        }
    }
}

/// Selector the delegated activation listener matches.
pub(crate) fn activator_selector(config: &WidgetConfig) -> String {
    format!("{} a", config.item_tag)
}

/// Replace the children of `container` with one item per option.
pub(crate) fn render_items<B: Binding>(
    binding: &B,
    container: &B::Node,
    config: &WidgetConfig,
    snapshot: &OptionSnapshot<B::Node>,
    current: Option<&str>,
) {
    binding.empty(container);

    for option in snapshot {
        let state = ItemState::of(option, current);
        let class = match state.marker() {
            Some(marker) => format!("{} {}", config.item_class, marker),
            None => config.item_class.clone(),
        };

        let body = match state {
            ItemState::Interactive => {
                let anchor = binding.create("a", "");
                binding.set_attr(&anchor, "href", Some(&format!("#{}", option.value)));
                anchor
            }
            ItemState::Selected | ItemState::Disabled => binding.create("span", ""),
        };
        binding.set_text(&body, &option.label);

        let item = binding.create(&config.item_tag, &class);
        binding.set_data(&item, &config.value_binding_key, &option.value);
        binding.append(&item, &body);
        binding.append(container, &item);
    }

    log::trace!("[select2list] rendered {} items", snapshot.len());
}
