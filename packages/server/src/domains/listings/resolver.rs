//! Listing resolution from an opaque path segment.
//!
//! Detail URLs accept anything a user (or an old inbound link) might throw
//! at them: a numeric primary key, the canonical slug, a truncated or
//! extended slug, or a mangled variant. Resolution tries increasingly loose
//! strategies and stops at the first hit:
//!
//! 1. purely numeric segment -> primary-key lookup among approved records
//! 2. exact match against each approved record's computed slug
//! 3. substring match either direction between slug and input
//! 4. fuzzy token fallback: ILIKE on the first significant token, results
//!    scored by how many tokens appear in the name
//! 5. ILIKE with hyphens widened to wildcards across the whole input
//! 6. not found
//!
//! Query failures are logged and degrade to "no match for this step";
//! nothing here retries or propagates backend errors to the page.

use sqlx::PgPool;

use crate::common::slug::{
    is_numeric_segment, needs_canonical_redirect, score_name, significant_tokens,
};
use crate::common::ListingId;

use super::models::{Listing, ListingKind};

/// Outcome of resolving a path segment.
#[derive(Debug)]
pub enum Resolved {
    /// The segment already is (a close variant of) the canonical slug.
    Found(Listing),
    /// The listing matched under a numeric ID or a significantly different
    /// slug; the caller should redirect to the canonical URL instead of
    /// serving a duplicate-content page.
    Redirect { listing: Listing, location: String },
    NotFound,
}

/// Resolve a detail-page path segment to an approved listing.
pub async fn resolve_listing(kind: ListingKind, segment: &str, pool: &PgPool) -> Resolved {
    let segment = segment.trim().to_lowercase();
    if segment.is_empty() {
        return Resolved::NotFound;
    }

    // 1. Numeric segments are primary-key lookups; they do not fall through
    // to slug matching, and always redirect to the canonical slug URL.
    if is_numeric_segment(&segment) {
        return match ListingId::parse(&segment) {
            Ok(id) => match Listing::find_approved_by_id(id, pool).await {
                Ok(Some(listing)) => redirect_to_canonical(listing),
                Ok(None) => Resolved::NotFound,
                Err(e) => {
                    tracing::warn!(error = %e, %segment, "listing lookup by id failed");
                    Resolved::NotFound
                }
            },
            // Numeric but too large for a key; nothing can match it.
            Err(_) => Resolved::NotFound,
        };
    }

    // 2 + 3. Slugs are computed, not stored, so matching fetches the
    // approved candidates of this kind and compares derived slugs.
    let candidates = match Listing::find_all_approved(kind, pool).await {
        Ok(candidates) => candidates,
        Err(e) => {
            tracing::warn!(error = %e, %segment, "fetching slug candidates failed");
            Vec::new()
        }
    };
    if let Some(listing) = match_by_slug(candidates, &segment) {
        return finish(listing, &segment);
    }

    // 4. Fuzzy token fallback.
    let tokens = significant_tokens(&segment);
    if let Some(first) = tokens.first() {
        match Listing::search_approved_by_name(kind, first, pool).await {
            Ok(results) => {
                if let Some(listing) = pick_best_scored(results, &tokens) {
                    return finish(listing, &segment);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, %segment, "fuzzy name search failed");
            }
        }
    }

    // 5. Last resort: widen hyphens to wildcards and take the first hit.
    let pattern = format!("%{}%", segment.replace('-', "%"));
    match Listing::search_approved_by_pattern(kind, &pattern, pool).await {
        Ok(results) => {
            if let Some(listing) = results.into_iter().next() {
                return finish(listing, &segment);
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, %segment, "wildcard name search failed");
        }
    }

    Resolved::NotFound
}

/// Steps 2 and 3: exact slug equality, then substring either direction.
fn match_by_slug(candidates: Vec<Listing>, segment: &str) -> Option<Listing> {
    let slugs: Vec<String> = candidates.iter().map(|l| l.slug()).collect();

    if let Some(pos) = slugs.iter().position(|slug| slug == segment) {
        return candidates.into_iter().nth(pos);
    }

    let pos = slugs
        .iter()
        .position(|slug| slug.contains(segment) || segment.contains(slug.as_str()))?;
    candidates.into_iter().nth(pos)
}

/// Step 4 scoring: highest token-hit count wins; score 0 never matches.
///
/// Ties keep the first result in query order. That tie-break is arbitrary
/// (two listings with equally-matching names are indistinguishable here)
/// and is kept only because the URLs it produces are stable.
fn pick_best_scored(results: Vec<Listing>, tokens: &[&str]) -> Option<Listing> {
    let mut best: Option<(usize, Listing)> = None;
    for listing in results {
        let score = score_name(&listing.name, tokens);
        if score > 0 && best.as_ref().map_or(true, |(s, _)| score > *s) {
            best = Some((score, listing));
        }
    }
    best.map(|(_, listing)| listing)
}

fn finish(listing: Listing, segment: &str) -> Resolved {
    if needs_canonical_redirect(segment, &listing.slug()) {
        redirect_to_canonical(listing)
    } else {
        Resolved::Found(listing)
    }
}

fn redirect_to_canonical(listing: Listing) -> Resolved {
    let location = listing.path();
    Resolved::Redirect { listing, location }
}
