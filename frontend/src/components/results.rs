use super::super::Model;
use shared::Mode;
use yew::prelude::*;

pub fn render_result(model: &Model) -> Html {
    let Some(result) = model.session.result() else {
        return html! {};
    };

    let url = result.url().to_string();
    let media = match result.kind() {
        Mode::Image => html! { <img class="result-media" src={url.clone()} alt="Swapped Face" /> },
        Mode::Video => html! { <video class="result-media" src={url.clone()} controls=true /> },
    };

    html! {
        <div class="results-container">
            <div class="result-header">
                <h2>{"Your Face Swap Result"}</h2>
            </div>
            { media }
            <a class="analyze-btn download-btn" href={url} download={result.file_name()}>
                <i class="fa-solid fa-download"></i>{" Download Result"}
            </a>
        </div>
    }
}
