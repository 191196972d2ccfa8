use crate::dom::{ContentDoc, classes, element, escape_html_text, first_in};

pub fn code_language(classes: &[String]) -> Option<&str> {
    classes
        .iter()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|lang| !lang.is_empty() && *lang != "none")
}

/// Wraps each annotated code block with a visible language tag.
pub fn add_code_labels(doc: &ContentDoc) {
    for pre in doc.all("pre") {
        let Some(code) = first_in(&pre, "code") else {
            continue;
        };
        let code_classes = classes(&code);
        let Some(lang) = code_language(&code_classes) else {
            continue;
        };
        let Some(wrapper) = element(&format!(
            "<div class=\"code-block-wrapper\"><span class=\"code-lang-label\">{}</span></div>",
            escape_html_text(lang)
        )) else {
            continue;
        };
        pre.insert_before(wrapper.clone());
        wrapper.append(pre);
    }
}
