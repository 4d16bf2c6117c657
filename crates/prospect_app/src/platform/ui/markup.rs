//! HTML rendering of a result set. The page lands next to exported
//! spreadsheets so results survive the terminal session.

use prospect_core::{Company, ResultsView};

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn country_class(country: &str) -> &'static str {
    if country == "Canada" {
        "country-canada"
    } else {
        "country-usa"
    }
}

/// One card. Optional fields are omitted entirely except the address, which
/// falls back to `N/A`. `index` staggers the fade-in at 30 ms per card.
pub fn company_card(company: &Company, index: usize) -> String {
    let mut card = String::new();
    card.push_str(&format!(
        "<div class=\"company-card\" style=\"animation-delay: {}ms\">\n",
        index * 30
    ));
    card.push_str(&format!(
        "  <div class=\"company-name\">{}</div>\n",
        escape_html(&company.name)
    ));
    card.push_str(&format!(
        "  <div class=\"company-detail\"><strong>Industry:</strong> {}</div>\n",
        escape_html(&company.industry)
    ));
    if let Some(business_type) = &company.business_type {
        card.push_str(&format!(
            "  <div class=\"company-detail\"><strong>Type:</strong> {}</div>\n",
            escape_html(business_type)
        ));
    }
    card.push_str(&format!(
        "  <div class=\"company-detail\"><strong>Address:</strong> {}</div>\n",
        escape_html(company.address.as_deref().unwrap_or("N/A"))
    ));
    if let Some(phone) = &company.phone {
        card.push_str(&format!(
            "  <div class=\"company-detail\"><strong>Phone:</strong> <a href=\"tel:{0}\">{0}</a></div>\n",
            escape_html(phone)
        ));
    }
    if let Some(email) = &company.email {
        card.push_str(&format!(
            "  <div class=\"company-detail\"><strong>Email:</strong> <a href=\"mailto:{0}\">{0}</a></div>\n",
            escape_html(email)
        ));
    }
    if let Some(website) = &company.website {
        card.push_str(&format!(
            "  <div class=\"company-detail\"><strong>Website:</strong> <a href=\"{}\" target=\"_blank\">Visit</a></div>\n",
            escape_html(website)
        ));
    }
    if let Some(rating) = company.rating {
        card.push_str(&format!(
            "  <div class=\"company-detail\"><strong>Rating:</strong> {rating}/5</div>\n"
        ));
    }
    card.push_str(&format!(
        "  <span class=\"country-badge {}\">{}</span>\n",
        country_class(&company.country),
        escape_html(&company.country)
    ));
    card.push_str("</div>\n");
    card
}

pub fn results_page(results: &ResultsView) -> String {
    let mut page = String::new();
    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    page.push_str("<title>Search Results</title>\n<style>\n");
    page.push_str(PAGE_STYLE);
    page.push_str("</style>\n</head>\n<body>\n");
    page.push_str(&format!(
        "<h1>Found {} Companies</h1>\n<div class=\"companies-list\">\n",
        results.count
    ));
    for (index, company) in results.companies.iter().enumerate() {
        page.push_str(&company_card(company, index));
    }
    page.push_str("</div>\n</body>\n</html>\n");
    page
}

const PAGE_STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem; background: #f5f6f8; }
.companies-list { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
.company-card { background: #fff; border-radius: 8px; padding: 1rem; position: relative;
  opacity: 0; transform: translateY(20px); animation: rise 0.4s ease-out forwards; }
@keyframes rise { to { opacity: 1; transform: translateY(0); } }
.company-name { font-weight: 700; margin-bottom: 0.5rem; }
.company-detail { font-size: 0.9rem; margin: 0.15rem 0; }
.country-badge { position: absolute; top: 0.75rem; right: 0.75rem; border-radius: 4px;
  padding: 0.1rem 0.4rem; font-size: 0.75rem; color: #fff; }
.country-usa { background: #3b5bdb; }
.country-canada { background: #e03131; }
";
