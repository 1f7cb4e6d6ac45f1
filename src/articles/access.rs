//! Who may change which article.

use crate::{
    articles::repo_types::Article,
    auth::repo_types::UserId,
    error::{Action, AppError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    DeniedNotAuthenticated,
    DeniedNotOwner,
    ArticleNotFound,
}

impl AccessDecision {
    pub fn is_allowed(self) -> bool {
        self == AccessDecision::Allowed
    }

    pub fn into_result(self, action: Action) -> Result<(), AppError> {
        match self {
            AccessDecision::Allowed => Ok(()),
            AccessDecision::DeniedNotAuthenticated => Err(AppError::NotAuthenticated(action)),
            AccessDecision::DeniedNotOwner => Err(AppError::NotOwner(action)),
            AccessDecision::ArticleNotFound => Err(AppError::ArticleNotFound),
        }
    }
}

/// Decision for editing or deleting `article` on behalf of `user`.
///
/// Anonymous callers are told to authenticate before anything else, so they
/// cannot learn which ids exist.
pub fn authorize_mutation(user: Option<UserId>, article: Option<&Article>) -> AccessDecision {
    let Some(user_id) = user else {
        return AccessDecision::DeniedNotAuthenticated;
    };
    let Some(article) = article else {
        return AccessDecision::ArticleNotFound;
    };
    if article.author_id == user_id {
        AccessDecision::Allowed
    } else {
        AccessDecision::DeniedNotOwner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: i64, author_id: UserId) -> Article {
        Article {
            id,
            title: "t".into(),
            content: "c".into(),
            author_id,
        }
    }

    #[test]
    fn owner_is_allowed() {
        let a = article(10, 1);
        assert_eq!(authorize_mutation(Some(1), Some(&a)), AccessDecision::Allowed);
    }

    #[test]
    fn other_user_is_not_owner() {
        let a = article(10, 1);
        assert_eq!(
            authorize_mutation(Some(2), Some(&a)),
            AccessDecision::DeniedNotOwner
        );
    }

    #[test]
    fn anonymous_is_not_authenticated_even_for_missing_article() {
        let a = article(10, 1);
        assert_eq!(
            authorize_mutation(None, Some(&a)),
            AccessDecision::DeniedNotAuthenticated
        );
        assert_eq!(
            authorize_mutation(None, None),
            AccessDecision::DeniedNotAuthenticated
        );
    }

    #[test]
    fn missing_article_for_signed_in_user() {
        assert_eq!(
            authorize_mutation(Some(1), None),
            AccessDecision::ArticleNotFound
        );
    }

    #[test]
    fn allowed_only_when_ids_match() {
        let users = [None, Some(1), Some(2), Some(3)];
        let articles = [None, Some(article(10, 1)), Some(article(11, 2))];
        for user in users {
            for a in &articles {
                let decision = authorize_mutation(user, a.as_ref());
                let owns = matches!((user, a), (Some(u), Some(a)) if a.author_id == u);
                assert_eq!(decision.is_allowed(), owns, "user={user:?} article={a:?}");
            }
        }
    }

    #[test]
    fn denials_map_to_errors() {
        assert!(AccessDecision::Allowed.into_result(Action::EditArticle).is_ok());
        assert!(matches!(
            AccessDecision::DeniedNotOwner.into_result(Action::DeleteArticle),
            Err(AppError::NotOwner(Action::DeleteArticle))
        ));
        assert!(matches!(
            AccessDecision::DeniedNotAuthenticated.into_result(Action::EditArticle),
            Err(AppError::NotAuthenticated(Action::EditArticle))
        ));
        assert!(matches!(
            AccessDecision::ArticleNotFound.into_result(Action::EditArticle),
            Err(AppError::ArticleNotFound)
        ));
    }
}
