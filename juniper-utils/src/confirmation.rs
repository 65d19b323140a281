use std::time::Duration;

use poise::serenity_prelude as serenity;

/// How long a destructive-action prompt waits before defaulting to
/// cancelled.
pub const CONFIRM_TIMEOUT_SECS: u64 = 30;

pub enum ConfirmationResult {
    Confirmed(serenity::ComponentInteraction),
    Declined(serenity::ComponentInteraction),
    TimedOut(serenity::Message),
}

/// Post a confirm/cancel button prompt and wait for the invoking user.
///
/// No response within `timeout` resolves to `TimedOut`; callers must treat
/// that as a cancellation and clean the prompt up.
pub async fn prompt_confirm_cancel<U, E>(
    ctx: poise::Context<'_, U, E>,
    content: impl Into<String>,
    embed: serenity::CreateEmbed,
    timeout: Duration,
) -> Result<ConfirmationResult, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    let ctx_id = ctx.id();
    let confirm_id = format!("{}_confirm", ctx_id);
    let cancel_id = format!("{}_cancel", ctx_id);

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(content)
                .embed(embed)
                .components(vec![serenity::CreateActionRow::Buttons(vec![
                    serenity::CreateButton::new(&confirm_id)
                        .label("Confirm")
                        .style(serenity::ButtonStyle::Danger),
                    serenity::CreateButton::new(&cancel_id)
                        .label("Cancel")
                        .style(serenity::ButtonStyle::Secondary),
                ])]),
        )
        .await?;

    let message = reply.message().await?.into_owned();
    let interaction = message
        .await_component_interaction(ctx)
        .author_id(ctx.author().id)
        .timeout(timeout)
        .await;

    let Some(interaction) = interaction else {
        return Ok(ConfirmationResult::TimedOut(message));
    };

    if interaction.data.custom_id == cancel_id {
        return Ok(ConfirmationResult::Declined(interaction));
    }

    Ok(ConfirmationResult::Confirmed(interaction))
}

/// Replace the prompt with a plain text outcome and acknowledge the
/// interaction where one exists. Returns the interaction only on confirm.
pub async fn settle_confirmation<U, E>(
    ctx: poise::Context<'_, U, E>,
    confirmation: ConfirmationResult,
    timed_out_text: &str,
    cancelled_text: &str,
    processing_text: &str,
) -> Result<Option<serenity::ComponentInteraction>, serenity::Error>
where
    U: Send + Sync,
    E: Send + Sync,
{
    match confirmation {
        ConfirmationResult::TimedOut(message) => {
            message
                .channel_id
                .edit_message(
                    ctx.http(),
                    message.id,
                    serenity::EditMessage::new()
                        .content(timed_out_text)
                        .embeds(vec![])
                        .components(vec![]),
                )
                .await?;
            Ok(None)
        }
        ConfirmationResult::Declined(interaction) => {
            interaction
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(cancelled_text)
                            .embeds(vec![])
                            .components(vec![]),
                    ),
                )
                .await?;
            Ok(None)
        }
        ConfirmationResult::Confirmed(interaction) => {
            interaction
                .create_response(
                    ctx.http(),
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .content(processing_text)
                            .embeds(vec![])
                            .components(vec![]),
                    ),
                )
                .await?;
            Ok(Some(interaction))
        }
    }
}
