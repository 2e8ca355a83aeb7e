use super::super::Model;
use super::super::Msg;
use yew::html::Scope;
use yew::prelude::*;

pub fn render_theme_toggle(theme: &str, link: &Scope<Model>) -> Html {
    let dark = theme == "dark";
    html! {
        <button
            id="theme-toggle"
            class="theme-toggle"
            onclick={link.callback(|_| Msg::ToggleTheme)}
            title={ if dark { "Switch to Bright Mode" } else { "Switch to Dark Mode" } }
        >
            <i class={classes!("fa-solid", if dark { "fa-sun" } else { "fa-moon" })}></i>
        </button>
    }
}
