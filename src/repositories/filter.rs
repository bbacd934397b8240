// src/repositories/filter.rs
//
// Equality filter over parent-reference columns, shared by `list` and
// `delete_many` on every collection.

use uuid::Uuid;

use crate::domain::EntityKind;
use crate::error::{AppError, AppResult};

/// Parent-reference columns a collection can be filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterColumn {
    Series,
    Season,
    Episode,
    Comment,
    User,
}

impl FilterColumn {
    fn column(self) -> &'static str {
        match self {
            FilterColumn::Series => "series_id",
            FilterColumn::Season => "season_id",
            FilterColumn::Episode => "episode_id",
            FilterColumn::Comment => "comment_id",
            FilterColumn::User => "user_id",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    pub series: Option<Uuid>,
    pub season: Option<Uuid>,
    pub episode: Option<Uuid>,
    pub comment: Option<Uuid>,
    pub user: Option<Uuid>,
}

impl Filter {
    pub fn series(id: Uuid) -> Self {
        Self {
            series: Some(id),
            ..Self::default()
        }
    }

    pub fn season(id: Uuid) -> Self {
        Self {
            season: Some(id),
            ..Self::default()
        }
    }

    pub fn episode(id: Uuid) -> Self {
        Self {
            episode: Some(id),
            ..Self::default()
        }
    }

    pub fn comment(id: Uuid) -> Self {
        Self {
            comment: Some(id),
            ..Self::default()
        }
    }

    pub fn with_episode(mut self, id: Uuid) -> Self {
        self.episode = Some(id);
        self
    }

    pub fn with_user(mut self, id: Uuid) -> Self {
        self.user = Some(id);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses().next().is_none()
    }

    fn clauses(&self) -> impl Iterator<Item = (FilterColumn, Uuid)> {
        [
            (FilterColumn::Series, self.series),
            (FilterColumn::Season, self.season),
            (FilterColumn::Episode, self.episode),
            (FilterColumn::Comment, self.comment),
            (FilterColumn::User, self.user),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.map(|id| (column, id)))
    }

    /// Build ` WHERE a = ?1 AND b = ?2` (or an empty string) plus its
    /// parameters. Filtering by a column the collection lacks is rejected.
    pub(crate) fn where_clause(
        &self,
        kind: EntityKind,
        allowed: &[FilterColumn],
    ) -> AppResult<(String, Vec<String>)> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        for (column, id) in self.clauses() {
            if !allowed.contains(&column) {
                return Err(AppError::validation(format!(
                    "{} documents have no {} reference",
                    kind,
                    column.column()
                )));
            }
            params.push(id.to_string());
            conditions.push(format!("{} = ?{}", column.column(), params.len()));
        }

        if conditions.is_empty() {
            Ok((String::new(), params))
        } else {
            Ok((format!(" WHERE {}", conditions.join(" AND ")), params))
        }
    }

    /// Same as `where_clause`, but an empty filter is refused so a bulk
    /// delete can never wipe a whole collection
    pub(crate) fn delete_clause(
        &self,
        kind: EntityKind,
        allowed: &[FilterColumn],
    ) -> AppResult<(String, Vec<String>)> {
        if self.is_empty() {
            return Err(AppError::validation(format!(
                "refusing to delete every {} document: filter is empty",
                kind
            )));
        }
        self.where_clause(kind, allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_where_clause_numbers_parameters() {
        let comment = Uuid::new_v4();
        let episode = Uuid::new_v4();
        let filter = Filter::comment(comment).with_episode(episode);

        let (sql, params) = filter
            .where_clause(
                EntityKind::Reply,
                &[FilterColumn::Episode, FilterColumn::Comment],
            )
            .unwrap();

        assert_eq!(sql, " WHERE episode_id = ?1 AND comment_id = ?2");
        assert_eq!(params, vec![episode.to_string(), comment.to_string()]);
    }

    #[test]
    fn test_unknown_column_is_rejected() {
        let filter = Filter::season(Uuid::new_v4());
        assert!(filter
            .where_clause(EntityKind::Review, &[FilterColumn::Series])
            .is_err());
    }

    #[test]
    fn test_empty_filter() {
        let filter = Filter::default();
        assert!(filter.is_empty());
        let (sql, params) = filter.where_clause(EntityKind::Season, &[]).unwrap();
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_delete_clause_refuses_empty_filter() {
        let err = Filter::default()
            .delete_clause(EntityKind::Comment, &[FilterColumn::Episode])
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(_)));

        let (sql, _) = Filter::episode(Uuid::new_v4())
            .delete_clause(EntityKind::Comment, &[FilterColumn::Episode])
            .unwrap();
        assert_eq!(sql, " WHERE episode_id = ?1");
    }
}
