//! User-facing texts.

use serde::Deserialize;

/// Language of every message the bot sends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ar,
}

impl Locale {
    /// Welcome text. `who` must already be HTML-safe.
    pub fn welcome(self, who: &str) -> String {
        match self {
            Locale::En => format!(
                "Hello {who}! I help you build websites with DeepSite. \
                 Send me a description of the website you want to create."
            ),
            Locale::Ar => format!(
                "مرحباً {who}! أنا بوت يساعدك في إنشاء مواقع ويب باستخدام DeepSite. \
                 أرسل لي وصفاً لموقع الويب الذي تريد إنشاءه."
            ),
        }
    }

    pub fn usage(self) -> &'static str {
        match self {
            Locale::En => {
                "Send me a description of the website you want, and I will build it \
                 for you with DeepSite.\n\n\
                 Example: Create a personal website for a graphic designer showcasing their work"
            }
            Locale::Ar => {
                "أرسل لي وصفاً لموقع الويب الذي تريد إنشاءه، وسأقوم بإنشائه لك باستخدام DeepSite.\n\n\
                 مثال: أنشئ موقع ويب شخصي لمصمم جرافيك يعرض أعماله"
            }
        }
    }

    pub fn working(self) -> &'static str {
        match self {
            Locale::En => "Building your website... this may take a few minutes. Please wait.",
            Locale::Ar => "جاري إنشاء موقع الويب... قد يستغرق هذا بضع دقائق. يرجى الانتظار.",
        }
    }

    pub fn success(self) -> &'static str {
        match self {
            Locale::En => "Your website is ready! Sending the results...",
            Locale::Ar => "تم إنشاء موقع الويب بنجاح! جاري إرسال النتائج...",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Locale::En => {
                "HTML code for your website. Open this file in any browser or host it \
                 on a platform such as GitHub Pages."
            }
            Locale::Ar => {
                "كود HTML لموقع الويب. يمكنك فتح هذا الملف في أي متصفح أو استضافته على منصة مثل GitHub Pages."
            }
        }
    }

    pub fn preview_options(self) -> &'static str {
        match self {
            Locale::En => {
                "You can preview the website in one of these ways:\n\n\
                 1. Open the HTML file on your device\n\
                 2. Use a service like https://htmlpreview.github.io/ to preview it online\n\
                 3. Host it on GitHub Pages or Netlify"
            }
            Locale::Ar => {
                "يمكنك معاينة الموقع باستخدام إحدى الطرق التالية:\n\n\
                 1. فتح الملف HTML على جهازك\n\
                 2. استخدام خدمة مثل https://htmlpreview.github.io/ لمعاينة الموقع عبر الإنترنت\n\
                 3. استضافة الموقع على GitHub Pages أو Netlify"
            }
        }
    }

    /// The generation endpoint answered with a non-success status.
    pub fn rejected(self, status: u16, site_url: &str) -> String {
        match self {
            Locale::En => format!(
                "Something went wrong while contacting DeepSite. Status: {status}\n\n\
                 You can visit the site directly and use it there: {site_url}"
            ),
            Locale::Ar => format!(
                "حدث خطأ أثناء الاتصال بـ DeepSite. الرمز: {status}\n\n\
                 يمكنك زيارة الموقع مباشرة واستخدامه: {site_url}"
            ),
        }
    }

    /// Any other failure, described verbatim.
    pub fn failed(self, error: &str, site_url: &str) -> String {
        match self {
            Locale::En => format!(
                "An error occurred: {error}\n\n\
                 You can visit the site directly and use it there: {site_url}"
            ),
            Locale::Ar => format!(
                "حدث خطأ: {error}\n\n\
                 يمكنك زيارة الموقع مباشرة واستخدامه: {site_url}"
            ),
        }
    }
}
