/// Deck-archetype statistics, one row per finished game since the bound.
pub const DECK_ARCHETYPE_SQL: &str = "SELECT format_name, tournament, winner, loser, win_reason, \
winner_deck_archetype, loser_deck_archetype, winner_side, enddatetime, id, \
timestampdiff(second, startdatetime, enddatetime) AS GameDuration, sealed_league_type \
FROM deck_archetype_view_public \
WHERE enddatetime >= ?";

pub const DECK_ARCHETYPE_COLUMNS: [&str; 12] = [
    "format_name",
    "tournament",
    "winner",
    "loser",
    "win_reason",
    "winner_deck_archetype",
    "loser_deck_archetype",
    "winner_side",
    "enddatetime",
    "id",
    "GameDuration",
    "sealed_league_type",
];

/// A SQL statement with its positional parameters, bound by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub params: Vec<String>,
}

pub fn deck_archetype_query(since: &str) -> BoundQuery {
    BoundQuery {
        name: "deck_archetype",
        sql: DECK_ARCHETYPE_SQL,
        params: vec![since.to_string()],
    }
}
