use crate::{
    model::{AuthToken, Id, User},
    repository::{AuthTokenRepository, UserRepository},
};
use anyhow::Result;
use chrono::{Duration, Utc};
use tracing::debug;

/// Stores a fresh token for `user` and drops the ones that have expired.
pub fn issue(user: &User, ttl: Duration, repo: &AuthTokenRepository) -> Result<AuthToken> {
    let purged = repo.delete_expired(&Utc::now())?;
    if purged > 0 {
        debug!(purged, "Deleted expired tokens");
    }

    let token = AuthToken::issue(&user.id, ttl);
    repo.insert(&token)?;
    Ok(token)
}

/// Resolves a bearer token to its user. Unknown and expired tokens resolve to `None`.
pub fn authenticate(
    token_id: &Id,
    token_repo: &AuthTokenRepository,
    user_repo: &UserRepository,
) -> Result<Option<User>> {
    let token = match token_repo.select_by_id(token_id)? {
        Some(token) => token,
        None => return Ok(None),
    };

    if token.is_expired(Utc::now()) {
        return Ok(None);
    }

    user_repo.select_by_id(&token.user_id)
}

#[cfg(test)]
mod test {
    use crate::{
        model::Id,
        repository::{AuthTokenRepository, UserRepository},
        test::{pool, user},
    };
    use anyhow::Result;
    use chrono::Duration;

    #[test]
    fn authenticate() -> Result<()> {
        let pool = pool();
        let (token_repo, user_repo) = (AuthTokenRepository::new(&pool), UserRepository::new(&pool));
        let user = user(&pool, "test");
        let token = super::issue(&user, Duration::minutes(30), &token_repo)?;
        assert_eq!(Some(user), super::authenticate(&token.id, &token_repo, &user_repo)?);
        Ok(())
    }

    #[test]
    fn authenticate_unknown() -> Result<()> {
        let pool = pool();
        let (token_repo, user_repo) = (AuthTokenRepository::new(&pool), UserRepository::new(&pool));
        assert!(super::authenticate(&Id::new(), &token_repo, &user_repo)?.is_none());
        Ok(())
    }

    #[test]
    fn issue_purges_expired() -> Result<()> {
        let pool = pool();
        let token_repo = AuthTokenRepository::new(&pool);
        let user = user(&pool, "test");
        let stale = super::issue(&user, Duration::minutes(-1), &token_repo)?;
        let fresh = super::issue(&user, Duration::minutes(30), &token_repo)?;
        assert!(token_repo.select_by_id(&stale.id)?.is_none());
        assert!(token_repo.select_by_id(&fresh.id)?.is_some());
        Ok(())
    }

    #[test]
    fn authenticate_expired() -> Result<()> {
        let pool = pool();
        let (token_repo, user_repo) = (AuthTokenRepository::new(&pool), UserRepository::new(&pool));
        let user = user(&pool, "test");
        let token = super::issue(&user, Duration::minutes(-1), &token_repo)?;
        assert!(super::authenticate(&token.id, &token_repo, &user_repo)?.is_none());
        Ok(())
    }
}
