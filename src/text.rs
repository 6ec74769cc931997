//! Fixed copy the controller writes into the page.

/// Two-step instructions shown when an empty query is submitted. Japanese
/// first, English underneath each step.
pub const EMPTY_QUERY_HELP_HTML: &str = "検索を開始するには / To start a search:<br><br>\
1. 上の検索欄にご質問を入力してください<br>\
&nbsp;&nbsp;&nbsp;Type your question in the search box above<br>\
&nbsp;&nbsp;&nbsp;例えば、「人生の意味についてどのように描かれていますか？」<br><br>\
2. 「検索」ボタンをクリックしてください<br>\
&nbsp;&nbsp;&nbsp;Click the \"Search\" button";

pub const LOADING_HTML: &str = "<div class=\"loading-container\">\
<div class=\"orb-pulse\"></div>\
<div class=\"loading-text\">考察中...</div>\
<div class=\"loading-explanation\">(この検索は通常の検索よりも深い分析を行います。しばらくお待ちください、通常約1分程度かかります)</div>\
</div>";

pub const RATE_LIMIT_TITLE: &str = "検索制限に達しました";
pub const RATE_LIMIT_BODY: &str =
    "セッションあたりの最大検索回数（3回）に達しました。新しいセッションを開始してください。";
pub const RATE_LIMIT_DISMISS: &str = "閉じる";

pub(crate) const RATE_LIMIT_OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; \
width: 100%; height: 100%; background-color: rgba(0, 0, 0, 0.5); display: flex; \
align-items: center; justify-content: center; z-index: 9999;";

pub(crate) const RATE_LIMIT_POPUP_STYLE: &str = "background-color: white; padding: 30px; \
border-radius: 10px; box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1); max-width: 400px; \
text-align: center;";
