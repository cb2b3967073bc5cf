//! Structural and behavioral failure scenarios.
//!
//! Each test builds a descriptor with a specific defect and asserts the
//! checker reports that defect — and only that defect — through the
//! human-readable error text hosts surface to format authors.

use bytes::Bytes;
use sealcheck_core::{CheckError, FormatDescriptor, check};

#[tokio::test]
async fn name_missing() {
    let err = check(&FormatDescriptor::empty()).await.unwrap_err();
    assert!(err.to_string().contains("requires the field \"name\" as a string"));
}

#[tokio::test]
async fn encrypt_missing() {
    let err = check(&FormatDescriptor::named("cool")).await.unwrap_err();
    assert!(err.to_string().contains("requires the function \"encrypt()\""));
}

#[tokio::test]
async fn decrypt_missing() {
    let format = FormatDescriptor::named("cool").encrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(err.to_string().contains("requires the function \"decrypt()\""));
}

#[tokio::test]
async fn name_cannot_have_dot() {
    let format = FormatDescriptor::named(".cool")
        .encrypt(|_, _| Box::new(()))
        .decrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(err.to_string().contains("has a name \".cool\" with a dot"));
}

#[tokio::test]
async fn name_cannot_have_weird_characters() {
    let format = FormatDescriptor::named("c#ool")
        .encrypt(|_, _| Box::new(()))
        .decrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(err.to_string().contains("has a name \"c#ool\" with invalid characters"));
}

#[tokio::test]
async fn encrypt_must_return_a_buffer() {
    let format = FormatDescriptor::named("cool")
        .encrypt(|_, _| Box::new(()))
        .decrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(err.to_string().contains("encrypt() function must return a buffer"));
}

#[tokio::test]
async fn decrypt_must_return_a_buffer() {
    let format = FormatDescriptor::named("cool")
        .encrypt(|_, _| Box::new(Bytes::from_static(&[1, 2, 3])))
        .decrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(err.to_string().contains("decrypt() function must return a buffer"));
}

#[tokio::test]
async fn decrypt_must_return_the_plaintext_encrypt_received() {
    let format = FormatDescriptor::named("cool")
        .encrypt(|_, _| Box::new(Bytes::from_static(&[1, 2, 3])))
        .decrypt(|_, _| Box::new(Bytes::from_static(&[9, 8, 7])));
    let err = check(&format).await.unwrap_err();
    assert!(
        err.to_string()
            .contains("decrypt() function must return the same plaintext as encrypt() received")
    );
}

#[tokio::test]
async fn only_the_first_violation_is_reported() {
    // Dotted name AND missing decrypt: the missing-function check runs
    // first, so that is the one violation the caller sees.
    let format = FormatDescriptor::named(".cool").encrypt(|_, _| Box::new(()));
    let err = check(&format).await.unwrap_err();
    assert!(matches!(err, CheckError::MissingMethod { method: "decrypt", .. }));
}
