use std::collections::BTreeMap;

use serde_json::json;

use super::{Section, Suite};
use crate::testing::TestCase;

/// The default conformance suite: public routes, then every way a protected
/// route can be called without, with a bad, or with somebody else's session.
pub fn builtin_suite() -> Suite {
    Suite {
        name: "Resurfacer backend authentication tests".into(),
        variables: BTreeMap::new(),
        sections: vec![
            included_routes(),
            missing_token(),
            invalid_token(),
            user_mismatch(),
            valid_auth(),
            special_cases(),
        ],
    }
}

fn included_routes() -> Section {
    Section {
        title: "1. INCLUDED ROUTES - Should work WITHOUT authentication".into(),
        note: None,
        cases: vec![
            TestCase::expect_success(
                "LibraryCache/getLiked (no token)",
                "LibraryCache/getLiked",
                json!({"userId": "{{validUser}}"}),
            ),
            TestCase::expect_success(
                "TrackScoring/preview (no token)",
                "TrackScoring/preview",
                json!({"userId": "{{validUser}}", "source": "liked", "size": 10}),
            ),
            TestCase::expect_success(
                "PlaylistHealth/getReport (no token)",
                "PlaylistHealth/getReport",
                json!({"snapshotId": "snapshot:test"}),
            ),
        ],
    }
}

fn missing_token() -> Section {
    Section {
        title: "2. EXCLUDED ROUTES - Missing token (Should FAIL)".into(),
        note: None,
        cases: vec![
            TestCase::expect_auth_rejection(
                "SwipeSessions/start (no token)",
                "SwipeSessions/start",
                json!({"userId": "{{validUser}}", "queueTracks": ["track:1"], "size": 1}),
            ),
            TestCase::expect_auth_rejection(
                "PlatformLink/listLinks (no token)",
                "PlatformLink/listLinks",
                json!({"userId": "{{validUser}}"}),
            ),
            TestCase::expect_auth_rejection(
                "TrackScoring/keep (no token)",
                "TrackScoring/keep",
                json!({"userId": "{{validUser}}", "trackId": "track:1"}),
            ),
            TestCase::expect_auth_rejection(
                "LibraryCache/sync (no token)",
                "LibraryCache/sync",
                json!({"userId": "{{validUser}}", "tracks": [], "likes": [], "plays": [], "playlists": []}),
            ),
        ],
    }
}

fn invalid_token() -> Section {
    Section {
        title: "3. EXCLUDED ROUTES - Invalid token (Should FAIL)".into(),
        note: None,
        cases: vec![
            TestCase::expect_auth_rejection(
                "SwipeSessions/start (invalid token)",
                "SwipeSessions/start",
                json!({
                    "sessionToken": "{{invalidToken}}",
                    "userId": "{{validUser}}",
                    "queueTracks": ["track:1"],
                    "size": 1
                }),
            ),
            TestCase::expect_auth_rejection(
                "TrackScoring/updateWeights (invalid token)",
                "TrackScoring/updateWeights",
                json!({
                    "sessionToken": "{{invalidToken}}",
                    "userId": "{{validUser}}",
                    "lastPlayedW": 0.5,
                    "likedWhenW": 0.3,
                    "timesSkippedW": 0.2
                }),
            ),
            TestCase::expect_auth_rejection(
                "PlaylistHealth/snapshot (invalid token)",
                "PlaylistHealth/snapshot",
                json!({
                    "sessionToken": "{{invalidToken}}",
                    "playlistId": "playlist:test",
                    "userId": "{{validUser}}",
                    "trackIds": ["track:1", "track:2"]
                }),
            ),
        ],
    }
}

fn user_mismatch() -> Section {
    Section {
        title: "4. EXCLUDED ROUTES - userId mismatch (Should FAIL)".into(),
        note: None,
        cases: vec![
            TestCase::expect_auth_rejection(
                "SwipeSessions/start (userId mismatch)",
                "SwipeSessions/start",
                json!({
                    "sessionToken": "{{validToken}}",
                    "userId": "{{wrongUser}}",
                    "queueTracks": ["track:1"],
                    "size": 1
                }),
            ),
            TestCase::expect_auth_rejection(
                "PlatformLink/startAuth (userId mismatch)",
                "PlatformLink/startAuth",
                json!({
                    "sessionToken": "{{validToken}}",
                    "userId": "{{wrongUser}}",
                    "platform": "spotify",
                    "scopes": ["user-library-read"],
                    "redirectUri": "http://localhost:3000/callback"
                }),
            ),
        ],
    }
}

fn valid_auth() -> Section {
    Section {
        title: "5. EXCLUDED ROUTES - Valid authentication (Should pass AUTH)".into(),
        note: Some("These may fail for business logic reasons, but auth should pass".into()),
        cases: vec![
            TestCase::expect_success(
                "PlatformLink/startAuth (valid auth)",
                "PlatformLink/startAuth",
                json!({
                    "sessionToken": "{{validToken}}",
                    "userId": "{{validUser}}",
                    "platform": "spotify",
                    "scopes": ["user-library-read"],
                    "redirectUri": "http://localhost:3000/callback"
                }),
            ),
            TestCase::expect_success(
                "TrackScoring/updateWeights (valid auth)",
                "TrackScoring/updateWeights",
                json!({
                    "sessionToken": "{{validToken}}",
                    "userId": "{{validUser}}",
                    "lastPlayedW": 0.5,
                    "likedWhenW": 0.3,
                    "timesSkippedW": 0.2
                }),
            ),
            TestCase::expect_success(
                "LibraryCache/sync (valid auth)",
                "LibraryCache/sync",
                json!({
                    "sessionToken": "{{validToken}}",
                    "userId": "{{validUser}}",
                    "tracks": [],
                    "likes": [],
                    "plays": [],
                    "playlists": []
                }),
            ),
        ],
    }
}

fn special_cases() -> Section {
    Section {
        title: "6. SPECIAL CASES".into(),
        note: None,
        cases: vec![
            // Rejected for an invalid OAuth state, not for missing auth.
            TestCase::expect_rejection(
                "PlatformLink/completeAuth (public endpoint, no token)",
                "PlatformLink/completeAuth",
                json!({"state": "state:test", "code": "auth_code_123"}),
            ),
        ],
    }
}
