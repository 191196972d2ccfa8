//! Share buttons and what happens when they are pressed.

use std::cell::Cell;
use std::time::Duration;

use tracing::{debug, warn};

use crate::dom::{ContentDoc, element, escape_attr, escape_html_text};
use crate::error::{HostError, ShareError};
use crate::host::{Host, ShareData};
use crate::lang::Strings;

/// How long the copy button shows its acknowledgement.
pub const COPIED_FOR: Duration = Duration::from_secs(2);

/// `<intent_url>?text=<title>&url=<url>`.
pub fn intent_link(intent_url: &str, data: &ShareData) -> String {
    format!(
        "{}?text={}&url={}",
        intent_url,
        urlencoding::encode(&data.title),
        urlencoding::encode(&data.url)
    )
}

pub fn insert_share_buttons(
    doc: &ContentDoc,
    data: &ShareData,
    intent_url: &str,
    native_available: bool,
    strings: &Strings,
) {
    let native = if native_available {
        format!(
            "<button type=\"button\" class=\"blog-share-btn blog-share-native\" data-share-action=\"native\">{}</button>",
            escape_html_text(strings.native_share)
        )
    } else {
        String::new()
    };
    let html = format!(
        "<div class=\"blog-share\"><span class=\"blog-share-heading\">{heading}</span>\
<button type=\"button\" class=\"blog-share-btn blog-share-copy\" data-share-action=\"copy\" data-share-url=\"{url}\">{copy}</button>\
<a class=\"blog-share-btn blog-share-x\" href=\"{intent}\" target=\"_blank\" rel=\"noopener noreferrer\">{x}</a>{native}</div>",
        heading = escape_html_text(strings.share_heading),
        url = escape_attr(&data.url),
        copy = escape_html_text(strings.copy_link),
        intent = escape_attr(&intent_link(intent_url, data)),
        x = escape_html_text(strings.share_on_x),
    );
    if let Some(node) = element(&html) {
        doc.append(node);
    }
}

/// State of the copy button's "copied" acknowledgement.
#[derive(Debug, Default)]
pub struct CopyAck {
    generation: Cell<u64>,
    copied: Cell<bool>,
}

impl CopyAck {
    pub fn is_copied(&self) -> bool {
        self.copied.get()
    }

    pub fn label<'a>(&self, strings: &'a Strings) -> &'a str {
        if self.is_copied() {
            strings.copied
        } else {
            strings.copy_link
        }
    }
}

/// Copies the post URL and holds the acknowledgement for [`COPIED_FOR`]. A
/// later copy restarts the window.
pub async fn copy_link<H: Host + ?Sized>(host: &H, url: &str, ack: &CopyAck) -> Result<(), HostError> {
    host.write_clipboard(url)?;
    let generation = ack.generation.get() + 1;
    ack.generation.set(generation);
    ack.copied.set(true);
    tokio::time::sleep(COPIED_FOR).await;
    if ack.generation.get() == generation {
        ack.copied.set(false);
    }
    Ok(())
}

/// Opens the host's share sheet, if it has one. Cancelling is not an error.
pub fn share_natively<H: Host + ?Sized>(host: &H, data: &ShareData) {
    let Some(native) = host.native_share() else {
        debug!("native share not available");
        return;
    };
    match native.share(data) {
        Ok(()) => {}
        Err(ShareError::Cancelled) => debug!("native share cancelled"),
        Err(err) => warn!(error = %err, url = %data.url, "native share failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NativeShare;
    use crate::lang::Lang;
    use std::cell::RefCell;

    fn data() -> ShareData {
        ShareData {
            title: "Hello & welcome".to_string(),
            url: "https://example.com/blog.html#post/p1".to_string(),
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        clipboard: RefCell<Vec<String>>,
        shared: RefCell<Vec<ShareData>>,
        outcome: Option<ShareError>,
    }

    impl NativeShare for RecordingHost {
        fn share(&self, data: &ShareData) -> Result<(), ShareError> {
            self.shared.borrow_mut().push(data.clone());
            match &self.outcome {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }
    }

    impl Host for RecordingHost {
        fn write_clipboard(&self, text: &str) -> Result<(), HostError> {
            self.clipboard.borrow_mut().push(text.to_string());
            Ok(())
        }

        fn native_share(&self) -> Option<&dyn NativeShare> {
            Some(self)
        }
    }

    #[test]
    fn encodes_intent_link() {
        assert_eq!(
            intent_link("https://twitter.com/intent/tweet", &data()),
            "https://twitter.com/intent/tweet?text=Hello%20%26%20welcome\
&url=https%3A%2F%2Fexample.com%2Fblog.html%23post%2Fp1"
        );
    }

    #[test]
    fn native_button_only_when_available() {
        let doc = ContentDoc::from_html("<h1>T</h1>");
        insert_share_buttons(&doc, &data(), "https://x.test/share", false, Lang::En.strings());
        assert!(doc.first("[data-share-action=copy]").is_some());
        assert!(doc.first(".blog-share-x").is_some());
        assert!(doc.first(".blog-share-native").is_none());

        let doc = ContentDoc::from_html("<h1>T</h1>");
        insert_share_buttons(&doc, &data(), "https://x.test/share", true, Lang::En.strings());
        assert!(doc.first(".blog-share-native").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn copied_acknowledgement_lasts_two_seconds() {
        let host = RecordingHost::default();
        let ack = CopyAck::default();
        let strings = Lang::En.strings();
        let copy = copy_link(&host, "https://example.com/#post/p1", &ack);
        let check = async {
            tokio::time::sleep(Duration::from_millis(1900)).await;
            assert!(ack.is_copied());
            assert_eq!(ack.label(strings), "Copied!");
            tokio::time::sleep(Duration::from_millis(200)).await;
            assert!(!ack.is_copied());
        };
        let (copied, ()) = tokio::join!(copy, check);
        copied.expect("clipboard write");
        assert_eq!(ack.label(strings), "Copy link");
        assert_eq!(
            host.clipboard.borrow().as_slice(),
            ["https://example.com/#post/p1".to_string()]
        );
    }

    #[tokio::test]
    async fn copy_without_clipboard_fails() {
        let ack = CopyAck::default();
        let result = copy_link(&crate::host::NullHost, "u", &ack).await;
        assert!(matches!(result, Err(HostError::Unsupported(_))));
        assert!(!ack.is_copied());
    }

    #[test]
    fn cancelled_share_is_ignored() {
        let host = RecordingHost {
            outcome: Some(ShareError::Cancelled),
            ..RecordingHost::default()
        };
        share_natively(&host, &data());
        assert_eq!(host.shared.borrow().len(), 1);
        share_natively(&crate::host::NullHost, &data());
    }
}
