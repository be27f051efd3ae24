//! OTP lifecycle manager implementation

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

use pv_shared::utils::identifier::normalize_identifier;
use pv_shared::utils::phone::{last_ten_digits, mask_phone_number, normalize_subscriber_number};

use crate::domain::entities::audit_block::actions;
use crate::domain::entities::challenge::{Challenge, CODE_LENGTH};
use crate::errors::{DomainError, DomainResult, OtpError, ValidationError};
use crate::repositories::{ChallengeRepository, InsertOutcome};
use crate::services::credential::{generate_code, CredentialHasher};
use crate::services::delivery::{DeliveryGateway, DeliveryReport};
use crate::services::ledger::AuditRecorder;
use crate::services::token::TokenIssuer;

use super::config::OtpLifecycleConfig;
use super::types::{SendChallengeResult, VerifyChallengeResult};

/// Owns every state transition of a Challenge
pub struct OtpLifecycleManager<R: ChallengeRepository + ?Sized> {
    repository: Arc<R>,
    hasher: Arc<CredentialHasher>,
    gateway: Arc<DeliveryGateway>,
    tokens: Arc<TokenIssuer>,
    recorder: Arc<dyn AuditRecorder>,
    config: OtpLifecycleConfig,
}

impl<R: ChallengeRepository + ?Sized> OtpLifecycleManager<R> {
    pub fn new(
        repository: Arc<R>,
        hasher: Arc<CredentialHasher>,
        gateway: Arc<DeliveryGateway>,
        tokens: Arc<TokenIssuer>,
        recorder: Arc<dyn AuditRecorder>,
        config: OtpLifecycleConfig,
    ) -> Self {
        Self {
            repository,
            hasher,
            gateway,
            tokens,
            recorder,
            config,
        }
    }

    pub fn config(&self) -> &OtpLifecycleConfig {
        &self.config
    }

    /// Issue a new challenge and deliver its code.
    ///
    /// The challenge is stored before any provider is called, so a delivery
    /// failure leaves a usable challenge and is reported as a warning.
    ///
    /// # Errors
    /// * `ValidationError` for a malformed identifier or phone
    /// * `OtpError::CooldownActive` when the previous challenge is too recent
    /// * `LedgerError::ChainConflict` when the delivery record could not be written
    pub async fn send_challenge(
        &self,
        identifier: &str,
        phone: &str,
    ) -> DomainResult<SendChallengeResult> {
        let identifier = normalize_identifier(identifier).ok_or(ValidationError::InvalidIdentifier)?;
        let phone = normalize_subscriber_number(phone).ok_or(ValidationError::InvalidPhone)?;
        let subject_index = self.hasher.blind_index(&identifier)?;

        let code = generate_code();
        let salt = CredentialHasher::generate_salt();
        let challenge = Challenge::new(
            subject_index,
            self.hasher.encrypt_identifier(&identifier)?,
            phone,
            CredentialHasher::hash_code(&code, &salt),
            salt,
            self.config.code_ttl,
        );

        let outcome = self
            .repository
            .insert_if_cooldown_elapsed(&challenge, self.config.resend_cooldown)
            .await?;
        if let InsertOutcome::CooldownActive { wait_seconds } = outcome {
            warn!(
                event = "otp_cooldown_active",
                subject = %index_prefix(&challenge.subject_index),
                wait_seconds,
                "Challenge requested inside resend cooldown"
            );
            return Err(OtpError::CooldownActive { wait_seconds }.into());
        }

        info!(
            event = "otp_challenge_created",
            subject = %index_prefix(&challenge.subject_index),
            challenge_id = %challenge.id,
            phone = %mask_phone_number(&challenge.phone),
            "Challenge stored, delivering code"
        );

        let message = format!(
            "Your Prabhav verification code is {}. It expires in {} minutes. Do not share it with anyone.",
            code,
            self.config.code_ttl_minutes()
        );
        let report = self.gateway.deliver(&challenge.phone, &message).await;

        self.record_delivery(&challenge, &report).await?;

        let (delivery_provider, warning) = match report.into_result() {
            Ok(receipt) => (Some(receipt.provider), None),
            Err(err) => {
                warn!(
                    event = "otp_delivery_failed",
                    subject = %index_prefix(&challenge.subject_index),
                    error = %err,
                    "Challenge stored but code was not delivered"
                );
                (None, Some(err.to_string()))
            }
        };

        Ok(SendChallengeResult {
            accepted: true,
            challenge_id: challenge.id,
            expires_at: challenge.expires_at,
            next_resend_at: challenge.created_at + self.config.resend_cooldown,
            delivery_provider,
            warning,
        })
    }

    /// Check a code against the subject's newest unverified challenge.
    ///
    /// A malformed code is rejected before any lookup and costs no attempt.
    /// On success the challenge becomes terminal and a
    /// `otp-verified-pending-password` token is issued.
    pub async fn verify_challenge(
        &self,
        identifier: &str,
        code: &str,
    ) -> DomainResult<VerifyChallengeResult> {
        let identifier = normalize_identifier(identifier).ok_or(ValidationError::InvalidIdentifier)?;
        let code = code.trim();
        if code.len() != CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidCodeFormat.into());
        }
        let subject_index = self.hasher.blind_index(&identifier)?;

        // Each lost compare-and-swap means another attempt was recorded, so
        // the loop is bounded by the attempt limit.
        for _ in 0..=self.config.max_attempts {
            let mut challenge = self
                .repository
                .find_latest_unverified(&subject_index)
                .await?
                .ok_or(OtpError::ChallengeNotFound)?;

            self.ensure_usable(&challenge).await?;

            let expected_attempts = challenge.attempts;
            if CredentialHasher::verify_code(code, &challenge.salt, &challenge.code_hash) {
                challenge.mark_verified();
                if !self
                    .repository
                    .compare_and_update(&challenge, expected_attempts)
                    .await?
                {
                    debug!(challenge_id = %challenge.id, "Challenge changed during verify, retrying");
                    continue;
                }
                return self.complete_verification(challenge);
            }

            challenge.record_failed_attempt();
            if !self
                .repository
                .compare_and_update(&challenge, expected_attempts)
                .await?
            {
                debug!(challenge_id = %challenge.id, "Challenge changed during verify, retrying");
                continue;
            }

            let remaining_attempts = challenge.remaining_attempts(self.config.max_attempts);
            warn!(
                event = "otp_invalid_code",
                subject = %index_prefix(&challenge.subject_index),
                challenge_id = %challenge.id,
                attempts = challenge.attempts,
                remaining_attempts,
                "Invalid verification code"
            );
            if remaining_attempts == 0 {
                self.repository.delete(challenge.id).await?;
                info!(
                    event = "otp_challenge_exhausted",
                    challenge_id = %challenge.id,
                    "Challenge removed after reaching the attempt limit"
                );
            }
            return Err(OtpError::InvalidCode { remaining_attempts }.into());
        }

        Err(DomainError::internal("challenge kept changing during verification"))
    }

    /// Mark a challenge verified on the strength of an external attestation
    /// that the subject controls `attested_phone`. No code is compared.
    ///
    /// The exact phone is tried first, then its last ten digits, so an
    /// attestation carrying a country code still matches.
    pub async fn verify_by_external_assertion(
        &self,
        identifier: &str,
        attested_phone: &str,
    ) -> DomainResult<VerifyChallengeResult> {
        let identifier = normalize_identifier(identifier).ok_or(ValidationError::InvalidIdentifier)?;
        let attested_phone = attested_phone.trim();
        if attested_phone.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "phone".to_string(),
            }
            .into());
        }
        let subject_index = self.hasher.blind_index(&identifier)?;

        for _ in 0..=self.config.max_attempts {
            let mut challenge = match self
                .repository
                .find_latest_unverified_by_phone(&subject_index, attested_phone)
                .await?
            {
                Some(challenge) => challenge,
                None => self
                    .repository
                    .find_latest_unverified_by_phone(&subject_index, &last_ten_digits(attested_phone))
                    .await?
                    .ok_or(OtpError::ChallengeNotFound)?,
            };

            if challenge.is_expired() {
                self.repository.delete(challenge.id).await?;
                info!(
                    event = "otp_challenge_expired",
                    challenge_id = %challenge.id,
                    "Expired challenge removed"
                );
                return Err(OtpError::ChallengeExpired.into());
            }

            let expected_attempts = challenge.attempts;
            challenge.mark_verified();
            if self
                .repository
                .compare_and_update(&challenge, expected_attempts)
                .await?
            {
                info!(
                    event = "otp_external_assertion",
                    subject = %index_prefix(&challenge.subject_index),
                    phone = %mask_phone_number(&challenge.phone),
                    "Challenge verified by external assertion"
                );
                return self.complete_verification(challenge);
            }
        }

        Err(DomainError::internal("challenge kept changing during verification"))
    }

    /// Whether the subject has completed any verification
    pub async fn is_verified(&self, identifier: &str) -> DomainResult<bool> {
        let identifier = normalize_identifier(identifier).ok_or(ValidationError::InvalidIdentifier)?;
        let subject_index = self.hasher.blind_index(&identifier)?;
        self.repository.has_verified(&subject_index).await
    }

    /// Remove every challenge for the subject, verified or not
    pub async fn clear(&self, identifier: &str) -> DomainResult<usize> {
        let identifier = normalize_identifier(identifier).ok_or(ValidationError::InvalidIdentifier)?;
        let subject_index = self.hasher.blind_index(&identifier)?;
        let removed = self.repository.delete_all_for_subject(&subject_index).await?;
        info!(
            event = "otp_challenges_cleared",
            subject = %index_prefix(&subject_index),
            removed,
            "Challenges cleared"
        );
        Ok(removed)
    }

    /// Expired or exhausted challenges are deleted and reported
    async fn ensure_usable(&self, challenge: &Challenge) -> DomainResult<()> {
        if challenge.is_expired() {
            self.repository.delete(challenge.id).await?;
            info!(
                event = "otp_challenge_expired",
                challenge_id = %challenge.id,
                "Expired challenge removed"
            );
            return Err(OtpError::ChallengeExpired.into());
        }

        if challenge.is_exhausted(self.config.max_attempts) {
            self.repository.delete(challenge.id).await?;
            warn!(
                event = "otp_too_many_attempts",
                challenge_id = %challenge.id,
                "Challenge removed after too many attempts"
            );
            return Err(OtpError::TooManyAttempts.into());
        }

        Ok(())
    }

    fn complete_verification(&self, challenge: Challenge) -> DomainResult<VerifyChallengeResult> {
        let issued = self.tokens.issue_pending_password(&challenge.subject_index)?;

        info!(
            event = "otp_verified",
            subject = %index_prefix(&challenge.subject_index),
            challenge_id = %challenge.id,
            "Challenge verified"
        );

        Ok(VerifyChallengeResult {
            challenge_id: challenge.id,
            subject_index: challenge.subject_index,
            phone: challenge.phone,
            scoped_token: issued.token,
            token_expires_at: issued.expires_at,
        })
    }

    async fn record_delivery(
        &self,
        challenge: &Challenge,
        report: &DeliveryReport,
    ) -> DomainResult<()> {
        let metadata = json!({
            "challenge_id": challenge.id.to_string(),
            "phone": mask_phone_number(&challenge.phone),
            "delivered": report.is_delivered(),
            "provider": report.provider(),
            "message_id": report.receipt.as_ref().map(|r| r.message_id.as_str()),
            "failures": report.failures,
        });

        self.recorder
            .record(actions::OTP_DELIVERY, &challenge.subject_index, metadata)
            .await?;
        Ok(())
    }
}

/// Short, non-reversible handle for log lines
fn index_prefix(subject_index: &str) -> &str {
    let end = subject_index.len().min(12);
    &subject_index[..end]
}
