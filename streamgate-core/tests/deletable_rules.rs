//! Delete decisions driven by the reference deletable rules

use std::sync::Arc;
use streamgate_core::config::PolicyConfig;
use streamgate_core::core_authz::{
    AuthorizationRequest, Authorizer, DenialReason, StreamCollaborators,
};
use streamgate_core::core_stream::{
    ActivityId, CommentId, GroupId, GroupSnapshot, InMemoryStreamDirectory, PersonId,
    StreamDeletableRules,
};
use streamgate_core::test_utils::*;

const BURNS: i64 = 1;
const LENNY: i64 = 7;
const SMITHERS: i64 = 99;
const HOMER: i64 = 6;

fn directory() -> Arc<InMemoryStreamDirectory> {
    let directory = StreamFixture::new()
        .person(BURNS, "mrburns", true, true)
        .person(LENNY, "lenny", true, true)
        .person(SMITHERS, "smithers", true, true)
        .person(HOMER, "homer", true, true)
        .group(GroupSnapshot::new(GroupId(38982), "plant", true))
        .coordinator(38982, BURNS)
        .activity(100, group_stream(38982, "plant"), person_stream(LENNY, "lenny"))
        .activity(200, person_stream(HOMER, "homer"), person_stream(LENNY, "lenny"))
        .comment(5, 100, HOMER)
        .comment(6, 200, LENNY)
        .build();
    directory.add_system_administrator(PersonId(SMITHERS));
    directory
}

fn authorizer(directory: &Arc<InMemoryStreamDirectory>) -> Authorizer {
    let rules = Arc::new(StreamDeletableRules::new(
        directory.clone(),
        directory.clone(),
        directory.clone(),
        directory.clone(),
    ));
    let collaborators = StreamCollaborators {
        activity_deletable: rules.clone(),
        comment_deletable: rules,
        ..StreamCollaborators::uniform(directory.clone())
    };
    Authorizer::new(collaborators, &PolicyConfig::default())
}

fn delete_activity(id: i64) -> AuthorizationRequest {
    AuthorizationRequest::DeleteActivity {
        activity_id: ActivityId(id),
    }
}

fn delete_comment(id: i64) -> AuthorizationRequest {
    AuthorizationRequest::DeleteComment {
        comment_id: CommentId(id),
    }
}

#[test]
fn activity_delete_by_role() {
    let directory = directory();
    let authorizer = authorizer(&directory);

    // author
    assert_allowed(&authorizer.decide(&principal(LENNY, "lenny"), &delete_activity(100)));
    // group coordinator
    assert_allowed(&authorizer.decide(&principal(BURNS, "mrburns"), &delete_activity(100)));
    // system administrator
    assert_allowed(&authorizer.decide(&principal(SMITHERS, "smithers"), &delete_activity(100)));
    // personal stream owner
    assert_allowed(&authorizer.decide(&principal(HOMER, "homer"), &delete_activity(200)));

    assert_denied_with(
        &authorizer.decide(&principal(HOMER, "homer"), &delete_activity(100)),
        &DenialReason::ActivityNotDeletable(ActivityId(100)),
    );
}

#[test]
fn comment_delete_by_role() {
    let directory = directory();
    let authorizer = authorizer(&directory);

    assert_allowed(&authorizer.decide(&principal(HOMER, "homer"), &delete_comment(5)));
    assert_allowed(&authorizer.decide(&principal(BURNS, "mrburns"), &delete_comment(5)));
    assert_denied_with(
        &authorizer.decide(&principal(LENNY, "lenny"), &delete_comment(5)),
        &DenialReason::CommentNotDeletable(CommentId(5)),
    );

    // homer owns the stream comment 6 lives on
    assert_allowed(&authorizer.decide(&principal(HOMER, "homer"), &delete_comment(6)));
    assert_denied(&authorizer.decide(&principal(SMITHERS, "smithers"), &delete_comment(6)));
}

#[test]
fn unknown_account_denies_delete() {
    let directory = directory();
    let authorizer = authorizer(&directory);

    assert_lookup_denied(&authorizer.decide(&principal(50, "ghost"), &delete_activity(100)));
    assert_denied(&authorizer.decide(&principal(50, ""), &delete_comment(5)));
}
