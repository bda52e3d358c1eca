use scraper::Html;
use std::thread;
use std::time::Duration;

use crate::fetch::Fetcher;
use crate::models::JobOffer;
use crate::site::Site;

/// Fixed pause between successive page fetches, out of courtesy to the board.
const PAGE_DELAY: Duration = Duration::from_secs(2);

pub fn crawl(site: &dyn Site, fetcher: &Fetcher) -> Vec<JobOffer> {
    crawl_with(site, |url| fetcher.fetch(url).ok(), PAGE_DELAY)
}

/// Shared pagination loop: fetch the first page, read the page bound off its
/// navigation widget, then walk the remaining pages in order. Stops when a
/// page yields no listings (the empty-page heuristic beats the computed
/// bound) or when the bound is reached. A fetch failure ends the run but the
/// offers collected so far are returned, not discarded.
fn crawl_with<F>(site: &dyn Site, mut fetch: F, delay: Duration) -> Vec<JobOffer>
where
    F: FnMut(&str) -> Option<String>,
{
    let mut offers = Vec::new();

    let first = site.first_page();
    let url = site.page_url(first);
    println!("[{}] fetching first page: {}", site.name(), url);
    let Some(body) = fetch(&url) else {
        eprintln!("[{}] could not fetch the first page; nothing scraped", site.name());
        return offers;
    };

    let doc = Html::parse_document(&body);
    let last = site.last_page(&doc);
    println!("[{}] last page: {}", site.name(), last);

    let page_offers = site.extract(&doc);
    if page_offers.is_empty() {
        println!("[{}] no listings on the first page", site.name());
        return offers;
    }
    println!("[{}] page {}: {} listings", site.name(), first, page_offers.len());
    offers.extend(page_offers);

    let mut page = first;
    while page < last {
        page += 1;
        thread::sleep(delay);

        let url = site.page_url(page);
        println!("[{}] fetching page {}/{}: {}", site.name(), page, last, url);
        let Some(body) = fetch(&url) else {
            eprintln!(
                "[{}] failed to fetch {}; keeping the {} offers collected so far",
                site.name(),
                url,
                offers.len()
            );
            return offers;
        };

        let doc = Html::parse_document(&body);
        let page_offers = site.extract(&doc);
        if page_offers.is_empty() {
            println!("[{}] page {} is empty; stopping", site.name(), page);
            break;
        }
        println!("[{}] page {}: {} listings", site.name(), page, page_offers.len());
        offers.extend(page_offers);
    }

    offers
}
