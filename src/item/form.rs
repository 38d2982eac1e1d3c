//! Shared form fields for the item create and edit pages.

use maud::{Markup, html};

use crate::{
    database_id::GroupId,
    group::Group,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

pub struct ItemFormDefaults<'a> {
    pub name: Option<&'a str>,
    pub price: Option<f64>,
    pub group_id: Option<GroupId>,
    pub autofocus_name: bool,
}

pub fn item_form_fields(defaults: &ItemFormDefaults<'_>, available_groups: &[Group]) -> Markup {
    let price_str = defaults.price.map(|price| format!("{price:.2}"));
    let name_placeholder = defaults.name.unwrap_or("Item name");

    html! {
        div
        {
            label
                for="name"
                class=(FORM_LABEL_STYLE)
            {
                "Name"
            }

            input
                name="name"
                id="name"
                type="text"
                placeholder=(name_placeholder)
                required
                value=[defaults.name]
                autofocus[defaults.autofocus_name]
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label
                for="price"
                class=(FORM_LABEL_STYLE)
            {
                "Price"
            }

            div class="input-wrapper w-full"
            {
                input
                    name="price"
                    id="price"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    min="0"
                    required
                    value=[price_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label
                for="group_id"
                class=(FORM_LABEL_STYLE)
            {
                "Group"
            }

            select
                name="group_id"
                id="group_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a group" }

                @for group in available_groups {
                    @if Some(group.id) == defaults.group_id {
                        option value=(group.id) selected { (group.name) }
                    } @else {
                        option value=(group.id) { (group.name) }
                    }
                }
            }
        }
    }
}
