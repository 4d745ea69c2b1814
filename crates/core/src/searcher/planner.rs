//! Query planning - which sources are worth asking for a given query.

use std::collections::BTreeSet;

use super::{MediaKind, QueryContext, SourceId};

/// Sources eligible for `ctx`.
///
/// The two general swarm searches are always included; the catalog sources
/// only when the query shape lets them answer precisely.
pub fn eligible_sources(ctx: &QueryContext) -> BTreeSet<SourceId> {
    SourceId::ALL
        .into_iter()
        .filter(|id| is_eligible(*id, ctx))
        .collect()
}

/// Whether a single source can serve `ctx`.
pub fn is_eligible(id: SourceId, ctx: &QueryContext) -> bool {
    match id {
        SourceId::Yts => ctx.media_kind == MediaKind::Movie,
        SourceId::Eztv => ctx.media_kind == MediaKind::Series && ctx.external_id().is_some(),
        SourceId::Apibay | SourceId::Solidtorrents => true,
    }
}

/// Human-readable capability summary, used by the sources listing.
pub fn describe(id: SourceId) -> &'static str {
    match id {
        SourceId::Yts => "movies only, by external id or title",
        SourceId::Eztv => "series only, requires external id",
        SourceId::Apibay | SourceId::Solidtorrents => "any media, free-text search",
    }
}
