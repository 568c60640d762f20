use relayquiz::room::models::Player;
use relayquiz::shared::AppError;
use relayquiz::websockets::MessageType;

mod utils;

use utils::*;

#[tokio::test]
async fn test_created_room_ids_are_five_digit_and_unique() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;

    let mut seen = std::collections::HashSet::new();
    seen.insert(setup.room_id.clone());

    for i in 0..20 {
        let summary = setup
            .room_service
            .create_room(Player::new(format!("host-{i}"), "Host"), "History", None)
            .await
            .unwrap();
        assert_eq!(summary.id.len(), 5);
        assert!(summary.id.bytes().all(|b| b.is_ascii_digit()));
        assert!(seen.insert(summary.id), "room id allocated twice");
    }
}

#[tokio::test]
async fn test_join_is_idempotent_for_existing_members() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;

    // bob is already a member; a retried join must not change anything
    let summary = setup
        .room_service
        .join_room(&setup.room_id, Player::new("bob", "Bob"))
        .await
        .unwrap();
    assert_eq!(summary.member_count, 2);

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    MessageAssertion::for_all_players(&setup)
        .received_no_messages()
        .await;
}

#[tokio::test]
async fn test_fifth_join_is_rejected_and_roster_unchanged() {
    let setup = TestSetupBuilder::new().with_four_players().build().await;

    let result = setup
        .room_service
        .join_room(&setup.room_id, Player::new("eve", "Eve"))
        .await;
    assert!(matches!(result.unwrap_err(), AppError::RoomFull));

    let snapshot = setup.room_service.snapshot(&setup.room_id).await.unwrap();
    assert_eq!(snapshot.members.len(), 4);

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    MessageAssertion::for_all_players(&setup)
        .received_no_messages()
        .await;
}

#[tokio::test]
async fn test_join_broadcasts_player_joined_then_snapshot() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;

    setup
        .room_service
        .join_room(&setup.room_id, Player::new("carol", "Carol"))
        .await
        .unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let contents = MessageAssertion::for_players(&setup, vec!["alice", "bob"])
        .received_message_sequence(vec![MessageType::PlayerJoined, MessageType::GameState])
        .await;
    contents
        .into_iter()
        .next()
        .unwrap()
        .with_player("carol");
}

#[tokio::test]
async fn test_creator_departure_promotes_next_joined_member() {
    let setup = TestSetupBuilder::new().with_three_players().build().await;

    setup.send_leave("alice").await;

    MessageAssertion::for_players(&setup, vec!["bob", "carol"])
        .received_message_type(MessageType::PlayerLeft)
        .await
        .with_player("alice");
    MessageAssertion::for_players(&setup, vec!["bob", "carol"])
        .received_message_type(MessageType::CreatorChanged)
        .await
        .with_player("bob");
    MessageAssertion::for_players(&setup, vec!["bob", "carol"])
        .received_message_type(MessageType::GameState)
        .await;

    let snapshot = setup.room_service.snapshot(&setup.room_id).await.unwrap();
    assert_eq!(snapshot.creator_id, "bob");
}

#[tokio::test]
async fn test_last_member_leaving_evicts_the_room() {
    let setup = TestSetupBuilder::new().with_players(vec!["alice"]).build().await;

    setup.send_leave("alice").await;

    assert!(setup.registry.get(&setup.room_id).is_none());
    assert!(setup.registry.is_empty());
}

#[tokio::test]
async fn test_leave_by_non_member_errors_the_caller_only() {
    let setup = TestSetupBuilder::new().with_two_players().build().await;

    setup.send_leave("ghost").await;

    MessageAssertion::for_players(&setup, vec!["ghost"])
        .received_message_type(MessageType::Error)
        .await
        .with_error_containing("not a member");
    MessageAssertion::for_all_players(&setup)
        .received_no_messages()
        .await;
}
