use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{modality, JobOffer};
use crate::site::{selector, text_of, Site};

pub const DEFAULT_URL: &str = "https://www.rekrute.com/en/offres.html?s=1&p=1&o=1";

const BASE_DOMAIN: &str = "https://www.rekrute.com";

/// Sentinel company name Rekrute shows when the employer withholds its name.
const CONFIDENTIAL: &str = "Confidentiel";

const LABEL_EXPERIENCE: &str = "Experience required :";
const LABEL_STUDY_LEVEL: &str = "Level of study required :";
const LABEL_SECTOR: &str = "Sector of activity :";
const LABEL_CONTRACT: &str = "Type of contract proposed :";

pub struct Rekrute {
    base_url: String,
    posts: Selector,
    title_link: Selector,
    logo: Selector,
    anchors: Selector,
    description: Selector,
    date_spans: Selector,
    details: Selector,
    page_select: Selector,
    page_options: Selector,
    company_href: Regex,
    page_param: Regex,
}

impl Rekrute {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            posts: selector("li.post-id")?,
            title_link: selector("a.titreJob")?,
            logo: selector("img.photo")?,
            anchors: selector("a")?,
            description: selector("div.holder span[style*='color: #5b5b5b']")?,
            date_spans: selector("em.date span")?,
            details: selector("li")?,
            page_select: selector("select[onchange='location = this.value;']")?,
            page_options: selector("option")?,
            company_href: Regex::new(r"/en/[^/]+-emploi-recrutement-\d+\.html")?,
            page_param: Regex::new(r"p=(\d+)")?,
        })
    }

    fn company_name(&self, post: ElementRef) -> Option<String> {
        // Prefer the logo's alt text, then a company-profile link,
        // then the confidentiality sentinel.
        if let Some(img) = post.select(&self.logo).next() {
            if let Some(alt) = img.value().attr("alt") {
                let alt = alt.trim();
                if !alt.is_empty() {
                    return Some(alt.to_string());
                }
            }
        }
        for a in post.select(&self.anchors) {
            if let Some(href) = a.value().attr("href") {
                if self.company_href.is_match(href) {
                    let name = text_of(a);
                    if !name.is_empty() {
                        return Some(name);
                    }
                }
            }
        }
        if post.html().contains(CONFIDENTIAL) {
            return Some(CONFIDENTIAL.to_string());
        }
        None
    }

    fn description(&self, post: ElementRef) -> Option<String> {
        let parts: Vec<String> = post
            .select(&self.description)
            .map(text_of)
            .filter(|t| !t.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("\n\n"))
        }
    }

    /// Publication and expiration dates come as two d/m/Y spans. A parse
    /// failure on either leaves all four date fields None.
    fn fill_dates(&self, post: ElementRef, offer: &mut JobOffer) {
        let spans: Vec<String> = post.select(&self.date_spans).map(text_of).collect();
        if spans.len() < 2 {
            return;
        }
        let published = NaiveDate::parse_from_str(&spans[0], "%d/%m/%Y");
        let expires = NaiveDate::parse_from_str(&spans[1], "%d/%m/%Y");
        if let (Ok(published), Ok(expires)) = (published, expires) {
            offer.date_publication = Some(published.format("%Y-%m-%d").to_string());
            offer.date_expiration = Some(expires.format("%Y-%m-%d").to_string());
            let stamp = format!("{} 00:00:00", published.format("%Y-%m-%d"));
            offer.created_at = Some(stamp.clone());
            offer.updated_at = Some(stamp);
        }
    }

    /// Keyed detail lines, recognized by literal label substrings over the
    /// listing's list items.
    fn fill_details(&self, post: ElementRef, offer: &mut JobOffer) {
        let mut saw_contract_line = false;
        for li in post.select(&self.details) {
            let line = text_of(li);
            if line.contains(LABEL_EXPERIENCE) {
                offer.experience = li
                    .select(&self.anchors)
                    .next()
                    .map(text_of)
                    .filter(|t| !t.is_empty());
            } else if line.contains(LABEL_STUDY_LEVEL) {
                offer.study_level = li
                    .select(&self.anchors)
                    .next()
                    .map(text_of)
                    .filter(|t| !t.is_empty());
            } else if line.contains(LABEL_SECTOR) {
                let sectors: Vec<String> = li
                    .select(&self.anchors)
                    .map(text_of)
                    .filter(|t| !t.is_empty())
                    .collect();
                if !sectors.is_empty() {
                    offer.sector_activity = Some(sectors.join(" / "));
                }
            } else if line.contains(LABEL_CONTRACT) {
                saw_contract_line = true;
                let (kind, flexible) = telework(&line);
                offer.modality = Some(kind.to_string());
                offer.flexible_hours = Some(flexible);
            }
        }
        if !saw_contract_line {
            offer.modality = Some(modality::NOT_SPECIFIED.to_string());
            offer.flexible_hours = Some(0);
        }
    }
}

/// Map the telework phrase inside the contract line to a modality. The site
/// serves French or English depending on Accept-Language, so both phrasings
/// are matched. An unrecognized phrase falls back to on-site.
fn telework(line: &str) -> (&'static str, i64) {
    if line.contains("Télétravail : No") || line.contains("Telework : No") {
        (modality::ON_SITE, 0)
    } else if line.contains("Télétravail : Hybride") || line.contains("Telework : Hybrid") {
        (modality::HYBRID, 1)
    } else if line.contains("Télétravail : Yes") || line.contains("Telework : Yes") {
        (modality::REMOTE, 1)
    } else {
        (modality::ON_SITE, 0)
    }
}

impl Site for Rekrute {
    fn name(&self) -> &'static str {
        "rekrute"
    }

    fn first_page(&self) -> u32 {
        1
    }

    fn page_url(&self, page: u32) -> String {
        if page <= 1 {
            return self.base_url.clone();
        }
        // s=1 is the page size, o=1 the sort order the board defaults to.
        let stem = self.base_url.split('?').next().unwrap_or(&self.base_url);
        format!("{stem}?s=1&p={page}&o=1")
    }

    /// The page-jump <select> lists every page; its final option's value
    /// carries the last page number in its `p` query parameter.
    fn last_page(&self, doc: &Html) -> u32 {
        let Some(select) = doc.select(&self.page_select).next() else {
            return 1;
        };
        select
            .select(&self.page_options)
            .last()
            .and_then(|opt| opt.value().attr("value"))
            .and_then(|value| self.page_param.captures(value))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(1)
    }

    fn extract(&self, doc: &Html) -> Vec<JobOffer> {
        let mut offers = Vec::new();
        for post in doc.select(&self.posts) {
            let mut offer = JobOffer::new();

            offer.offer_id = post.value().attr("id").and_then(|id| id.parse().ok());

            if let Some(link) = post.select(&self.title_link).next() {
                offer.offer_url = link
                    .value()
                    .attr("href")
                    .map(|href| format!("{BASE_DOMAIN}{href}"));
                let text = text_of(link);
                match text.split_once('|') {
                    Some((title, location)) => {
                        offer.title = Some(title.trim().to_string());
                        offer.location = Some(location.trim().to_string());
                    }
                    None if !text.is_empty() => offer.title = Some(text),
                    None => {}
                }
            }

            offer.company_name = self.company_name(post);
            offer.description = self.description(post);
            self.fill_dates(post, &mut offer);
            self.fill_details(post, &mut offer);

            // No skills section on this board; left for manual enrichment.
            offer.skills = Some(String::new());

            offers.push(offer);
        }
        offers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::STATUS_ACTIVE;

    fn site() -> Rekrute {
        Rekrute::new(DEFAULT_URL).expect("selectors compile")
    }

    const FULL_POST: &str = r#"
        <ul>
          <li class="post-id" id="197345">
            <img class="photo" src="/logo.png" alt="Atlas Systems">
            <a class="titreJob" href="/en/offre-emploi-backend-197345.html">
              Backend Engineer | Casablanca
            </a>
            <div class="holder">
              <span style="color: #5b5b5b;">Build and operate services.</span>
              <span style="color: #5b5b5b;">Hiring for the platform team.</span>
            </div>
            <em class="date"><span>01/06/2025</span><span>31/07/2025</span></em>
            <ul>
              <li>Experience required : <a>From 3 to 5 years</a></li>
              <li>Level of study required : <a>Master's Degree</a></li>
              <li>Sector of activity : <a>Banking</a> <a>Insurance</a></li>
              <li>Type of contract proposed : CDI - Telework : Hybrid</li>
            </ul>
          </li>
        </ul>
    "#;

    #[test]
    fn test_extract_full_post() {
        let doc = Html::parse_document(FULL_POST);
        let offers = site().extract(&doc);
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];

        assert_eq!(offer.offer_id, Some(197345));
        assert_eq!(
            offer.offer_url.as_deref(),
            Some("https://www.rekrute.com/en/offre-emploi-backend-197345.html")
        );
        assert_eq!(offer.title.as_deref(), Some("Backend Engineer"));
        assert_eq!(offer.location.as_deref(), Some("Casablanca"));
        assert_eq!(offer.company_name.as_deref(), Some("Atlas Systems"));
        assert_eq!(
            offer.description.as_deref(),
            Some("Build and operate services.\n\nHiring for the platform team.")
        );
        assert_eq!(offer.date_publication.as_deref(), Some("2025-06-01"));
        assert_eq!(offer.date_expiration.as_deref(), Some("2025-07-31"));
        assert_eq!(offer.created_at.as_deref(), Some("2025-06-01 00:00:00"));
        assert_eq!(offer.updated_at.as_deref(), Some("2025-06-01 00:00:00"));
        assert_eq!(offer.experience.as_deref(), Some("From 3 to 5 years"));
        assert_eq!(offer.study_level.as_deref(), Some("Master's Degree"));
        assert_eq!(offer.sector_activity.as_deref(), Some("Banking / Insurance"));
        assert_eq!(offer.modality.as_deref(), Some(modality::HYBRID));
        assert_eq!(offer.flexible_hours, Some(1));
        assert_eq!(offer.skills.as_deref(), Some(""));
        assert_eq!(offer.status, STATUS_ACTIVE);
    }

    #[test]
    fn test_extract_bare_post_yields_none_fields() {
        let html = r#"<li class="post-id"><a class="titreJob" href="/en/x.html">DevOps Lead</a></li>"#;
        let doc = Html::parse_document(html);
        let offers = site().extract(&doc);
        assert_eq!(offers.len(), 1);
        let offer = &offers[0];

        assert_eq!(offer.title.as_deref(), Some("DevOps Lead"));
        assert_eq!(offer.location, None);
        assert_eq!(offer.company_name, None);
        assert_eq!(offer.description, None);
        assert_eq!(offer.date_publication, None);
        assert_eq!(offer.created_at, None);
        assert_eq!(offer.experience, None);
        assert_eq!(offer.study_level, None);
        assert_eq!(offer.sector_activity, None);
        // No contract line at all: sentinel, not a real category
        assert_eq!(offer.modality.as_deref(), Some(modality::NOT_SPECIFIED));
        assert_eq!(offer.flexible_hours, Some(0));
    }

    #[test]
    fn test_title_without_pipe_has_no_location() {
        let html = r#"<li class="post-id"><a class="titreJob" href="/x">Backend Engineer</a></li>"#;
        let doc = Html::parse_document(html);
        let offers = site().extract(&doc);
        assert_eq!(offers[0].title.as_deref(), Some("Backend Engineer"));
        assert_eq!(offers[0].location, None);
    }

    #[test]
    fn test_company_falls_back_to_profile_link() {
        let html = r#"
            <li class="post-id">
              <a href="/en/atlas-systems-emploi-recrutement-4821.html">Atlas Systems</a>
            </li>"#;
        let doc = Html::parse_document(html);
        let offers = site().extract(&doc);
        assert_eq!(offers[0].company_name.as_deref(), Some("Atlas Systems"));
    }

    #[test]
    fn test_company_falls_back_to_confidential_sentinel() {
        let html = r#"<li class="post-id"><span>Confidentiel</span></li>"#;
        let doc = Html::parse_document(html);
        let offers = site().extract(&doc);
        assert_eq!(offers[0].company_name.as_deref(), Some(CONFIDENTIAL));
    }

    #[test]
    fn test_unparseable_dates_fail_soft() {
        let html = r#"
            <li class="post-id">
              <em class="date"><span>soon</span><span>later</span></em>
            </li>"#;
        let doc = Html::parse_document(html);
        let offers = site().extract(&doc);
        assert_eq!(offers[0].date_publication, None);
        assert_eq!(offers[0].date_expiration, None);
        assert_eq!(offers[0].created_at, None);
        assert_eq!(offers[0].updated_at, None);
    }

    #[test]
    fn test_telework_phrasings() {
        assert_eq!(telework("Type : CDI - Telework : No"), (modality::ON_SITE, 0));
        assert_eq!(telework("Type : CDI - Télétravail : Non"), (modality::ON_SITE, 0));
        assert_eq!(telework("Type : CDI - Telework : Hybrid"), (modality::HYBRID, 1));
        assert_eq!(telework("Type : CDI - Télétravail : Hybride"), (modality::HYBRID, 1));
        assert_eq!(telework("Type : CDI - Telework : Yes"), (modality::REMOTE, 1));
        // Line present but no known phrase: default-safe on-site
        assert_eq!(telework("Type : CDI"), (modality::ON_SITE, 0));
    }

    #[test]
    fn test_last_page_from_select() {
        let html = r#"
            <select onchange="location = this.value;">
              <option value="/en/offres.html?s=1&p=1&o=1">1</option>
              <option value="/en/offres.html?s=1&p=2&o=1">2</option>
              <option value="/en/offres.html?s=1&p=57&o=1">57</option>
            </select>"#;
        let doc = Html::parse_document(html);
        assert_eq!(site().last_page(&doc), 57);
    }

    #[test]
    fn test_last_page_defaults_to_one_without_widget() {
        let doc = Html::parse_document("<html><body><p>no pagination</p></body></html>");
        assert_eq!(site().last_page(&doc), 1);
    }

    #[test]
    fn test_page_urls() {
        let site = site();
        assert_eq!(site.page_url(1), DEFAULT_URL);
        assert_eq!(
            site.page_url(3),
            "https://www.rekrute.com/en/offres.html?s=1&p=3&o=1"
        );
    }

    #[test]
    fn test_empty_page_yields_no_offers() {
        let doc = Html::parse_document("<html><body></body></html>");
        assert!(site().extract(&doc).is_empty());
    }
}
