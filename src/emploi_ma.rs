use anyhow::Result;
use chrono::{Local, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{modality, JobOffer};
use crate::site::{selector, strip_label, text_of, Site};

pub const DEFAULT_URL: &str = "https://www.emploi.ma/recherche-jobs-maroc";

const LABEL_STUDY_LEVEL: &str = "Niveau d´études requis :";
const LABEL_EXPERIENCE: &str = "Niveau d'expérience :";
const LABEL_REGION: &str = "Région de :";
const LABEL_SKILLS: &str = "Compétences clés :";

pub struct EmploiMa {
    base_url: String,
    cards: Selector,
    title_link: Selector,
    company: Selector,
    description: Selector,
    time: Selector,
    details: Selector,
    last_page_link: Selector,
    page_links: Selector,
    trailing_id: Regex,
    page_param: Regex,
}

impl EmploiMa {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: base_url.to_string(),
            cards: selector("div.card-job")?,
            title_link: selector("h3 a")?,
            company: selector("a.card-job-company")?,
            description: selector("div.card-job-description p")?,
            time: selector("time")?,
            details: selector("li")?,
            last_page_link: selector(
                "div.pagination li.pager-item.active.pagination-numbers[title='Aller à la dernière page'] a",
            )?,
            page_links: selector("div.pagination li.pager-item.active.pagination-numbers a")?,
            trailing_id: Regex::new(r"-(\d+)$")?,
            page_param: Regex::new(r"page=(\d+)")?,
        })
    }

    fn fill_details(&self, card: ElementRef, offer: &mut JobOffer) {
        for li in card.select(&self.details) {
            let line = text_of(li);
            if line.contains(LABEL_STUDY_LEVEL) {
                offer.study_level = strip_label(&line, LABEL_STUDY_LEVEL);
            } else if line.contains(LABEL_EXPERIENCE) {
                offer.experience = strip_label(&line, LABEL_EXPERIENCE);
            } else if line.contains(LABEL_REGION) {
                offer.location = strip_label(&line, LABEL_REGION);
            } else if line.contains(LABEL_SKILLS) {
                offer.skills = strip_label(&line, LABEL_SKILLS);
            }
        }
    }
}

impl Site for EmploiMa {
    fn name(&self) -> &'static str {
        "emploi.ma"
    }

    // The board's first results page is the bare URL; ?page=1 is the second.
    fn first_page(&self) -> u32 {
        0
    }

    fn page_url(&self, page: u32) -> String {
        if page == 0 {
            self.base_url.clone()
        } else {
            format!("{}?page={}", self.base_url, page)
        }
    }

    /// The "go to last page" link in the pagination widget carries the final
    /// `page` parameter. If that exact link is missing, fall back to the
    /// highest `page` among the visible number links; no widget means a
    /// single page.
    fn last_page(&self, doc: &Html) -> u32 {
        if let Some(last) = doc
            .select(&self.last_page_link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| self.page_param.captures(href))
            .and_then(|caps| caps[1].parse().ok())
        {
            return last;
        }
        doc.select(&self.page_links)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| self.page_param.captures(href))
            .filter_map(|caps| caps[1].parse().ok())
            .max()
            .unwrap_or(0)
    }

    fn extract(&self, doc: &Html) -> Vec<JobOffer> {
        let mut offers = Vec::new();
        for card in doc.select(&self.cards) {
            let mut offer = JobOffer::new();

            // The card's data-href is both the offer URL and, via its
            // trailing digits, the only source of the site's offer id.
            if let Some(href) = card.value().attr("data-href") {
                offer.offer_url = Some(href.to_string());
                offer.offer_id = self
                    .trailing_id
                    .captures(href)
                    .and_then(|caps| caps[1].parse().ok());
            }

            offer.title = card
                .select(&self.title_link)
                .next()
                .map(text_of)
                .filter(|t| !t.is_empty());
            offer.company_name = card
                .select(&self.company)
                .next()
                .map(text_of)
                .filter(|t| !t.is_empty());
            offer.description = card
                .select(&self.description)
                .next()
                .map(text_of)
                .filter(|t| !t.is_empty());

            if let Some(datetime) = card
                .select(&self.time)
                .next()
                .and_then(|t| t.value().attr("datetime"))
            {
                if let Ok(date) = NaiveDate::parse_from_str(datetime, "%Y-%m-%d") {
                    offer.date_publication = Some(date.format("%Y-%m-%d").to_string());
                }
            }
            let stamp = match &offer.date_publication {
                Some(date) => format!("{date} 00:00:00"),
                None => Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            };
            offer.created_at = Some(stamp.clone());
            offer.updated_at = Some(stamp);

            self.fill_details(card, &mut offer);

            // The board never states a telework arrangement on result cards.
            offer.modality = Some(modality::NOT_SPECIFIED.to_string());

            offers.push(offer);
        }
        offers
    }
}
