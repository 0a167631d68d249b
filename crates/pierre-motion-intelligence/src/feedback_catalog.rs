// ABOUTME: Pre-authored, always-encouraging form feedback messages and corrective instructions
// ABOUTME: Localized (pt-BR, en) with grammatical gender agreement from a user hint
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feedback message catalog
//!
//! Every (issue kind, severity) pair maps to one encouraging message and every
//! issue kind to one short corrective instruction. Messages never criticize.
//! Templates may contain the gendered tokens `{champion}`, `{warrior}` and
//! `{master}`, which are resolved against the user's gender hint; without a
//! hint the grammatical default of the locale is used.

use pierre_motion_core::models::{FormIssueKind, Locale, Severity, UserGender};

/// Gendered vocabulary: (token, masculine/default, feminine) per locale
const PT_BR_TOKENS: [(&str, &str, &str); 3] = [
    ("{champion}", "campeão", "campeã"),
    ("{warrior}", "guerreiro", "guerreira"),
    ("{master}", "mestre", "mestra"),
];

const EN_TOKENS: [(&str, &str, &str); 3] = [
    ("{champion}", "champ", "champ"),
    ("{warrior}", "warrior", "warrior"),
    ("{master}", "master", "master"),
];

/// Localized, gender-aware message lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeedbackCatalog {
    locale: Locale,
    gender: Option<UserGender>,
}

impl FeedbackCatalog {
    /// Catalog for a locale with no gender hint
    #[must_use]
    pub const fn new(locale: Locale) -> Self {
        Self {
            locale,
            gender: None,
        }
    }

    /// Same catalog with a gender hint
    #[must_use]
    pub const fn with_gender(mut self, gender: Option<UserGender>) -> Self {
        self.gender = gender;
        self
    }

    /// Update the gender hint
    pub fn set_gender(&mut self, gender: Option<UserGender>) {
        self.gender = gender;
    }

    /// Active locale
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Active gender hint
    #[must_use]
    pub const fn gender(&self) -> Option<UserGender> {
        self.gender
    }

    /// Encouraging message for an issue, with gendered tokens resolved
    #[must_use]
    pub fn message(&self, kind: FormIssueKind, severity: Severity) -> String {
        let template = match self.locale {
            Locale::PtBr => pt_br_message(kind, severity),
            Locale::En => en_message(kind, severity),
        };
        self.resolve_tokens(template)
    }

    /// Short corrective instruction for an issue kind
    #[must_use]
    pub const fn correction(&self, kind: FormIssueKind) -> &'static str {
        match self.locale {
            Locale::PtBr => pt_br_correction(kind),
            Locale::En => en_correction(kind),
        }
    }

    fn resolve_tokens(&self, template: &str) -> String {
        let tokens = match self.locale {
            Locale::PtBr => &PT_BR_TOKENS,
            Locale::En => &EN_TOKENS,
        };
        tokens
            .iter()
            .fold(template.to_owned(), |text, (token, default, feminine)| {
                if !text.contains(token) {
                    return text;
                }
                let word = match self.gender {
                    Some(UserGender::Female) => feminine,
                    Some(UserGender::Male) | None => default,
                };
                text.replace(token, word)
            })
    }
}

const fn pt_br_message(kind: FormIssueKind, severity: Severity) -> &'static str {
    use FormIssueKind as K;
    use Severity as S;
    match (kind, severity) {
        (K::KneeOverToes, S::Minor) => "Ótimo ritmo! Deixe os joelhos só um pouco mais atrás 👍",
        (K::KneeOverToes, S::Moderate) => "Você está indo bem! Leve o quadril para trás 💪",
        (K::KneeOverToes, S::Significant) => {
            "Vamos ajustar juntos, {champion}: sente para trás como numa cadeira 🪑"
        }
        (K::BackRounding, S::Minor) => "Quase perfeito! Peito aberto e erguido ✨",
        (K::BackRounding, S::Moderate) => "Bom trabalho! Olhar para frente ajuda a postura 👀",
        (K::BackRounding, S::Significant) => {
            "Você consegue, {warrior}! Imagine um fio puxando o peito para cima 🎯"
        }
        (K::InsufficientDepth, S::Minor) => "Excelente! Quando estiver confortável, desça mais um pouquinho 🌟",
        (K::InsufficientDepth, S::Moderate) => "Muito bom! A cada repetição, um pouco mais fundo 📈",
        (K::InsufficientDepth, S::Significant) => "Continue assim! A amplitude vem com a prática 🚀",
        (K::Asymmetry, S::Minor) => "Boa forma! Distribua o peso igual nos dois lados ⚖️",
        (K::Asymmetry, S::Moderate) => "Você está evoluindo! Mantenha os dois lados alinhados 🎯",
        (K::Asymmetry, S::Significant) => "Vamos equilibrar: atenção aos dois lados do corpo 💫",
        (K::ElbowFlare, S::Minor) => "Quase lá! Cotovelos um pouco mais perto do corpo 💪",
        (K::ElbowFlare, S::Moderate) => "Boa força! Cotovelos em uns 45 graus 📐",
        (K::ElbowFlare, S::Significant) => {
            "Vamos ajustar, {champion}: cotovelos apontando para trás, não para os lados ➡️"
        }
        (K::HipSag, S::Minor) => "Ótima base! Mantenha o quadril alinhado ✨",
        (K::HipSag, S::Moderate) => "Força no abdômen! Suba o quadril um pouquinho 🎯",
        (K::HipSag, S::Significant) => {
            "Você consegue, {warrior}! Uma linha reta da cabeça aos pés 📏"
        }
        (K::NeckStrain, S::Minor) => "Boa postura! Pescoço relaxado e neutro 👍",
        (K::NeckStrain, S::Moderate) => "Relaxe o pescoço! Fixe o olhar num ponto no chão 👀",
        (K::NeckStrain, S::Significant) => "Cuide do pescoço! Alinhe a cabeça com a coluna 🦒",
        (K::PaceTooFast, S::Minor) => "Energia boa! Tente um ritmo um pouco mais controlado ⏱️",
        (K::PaceTooFast, S::Moderate) => "Que entusiasmo! Movimento lento rende mais 🏆",
        (K::PaceTooFast, S::Significant) => {
            "Calma, {champion}! Qualidade vale mais que quantidade 🐢"
        }
        (K::LimitedRange, S::Minor) => "Bom começo! A amplitude aumenta com o tempo 📈",
        (K::LimitedRange, S::Moderate) => "Progresso é progresso! Continue praticando 💪",
        (K::LimitedRange, S::Significant) => {
            "Um pouco melhor a cada dia, {master}! Respeite seus limites 🌱"
        }
    }
}

const fn pt_br_correction(kind: FormIssueKind) -> &'static str {
    match kind {
        FormIssueKind::KneeOverToes => "Empurre o quadril para trás antes de dobrar os joelhos",
        FormIssueKind::BackRounding => "Peito erguido e olhar para frente",
        FormIssueKind::InsufficientDepth => "Desça até as coxas ficarem paralelas ao chão",
        FormIssueKind::Asymmetry => "Distribua o peso igualmente entre os dois pés",
        FormIssueKind::ElbowFlare => "Cotovelos a 45 graus do corpo",
        FormIssueKind::HipSag => "Contraia abdômen e glúteos",
        FormIssueKind::NeckStrain => "Olhar para baixo, pescoço neutro",
        FormIssueKind::PaceTooFast => "Conte 2 segundos descendo e 2 subindo",
        FormIssueKind::LimitedRange => "Alongue-se antes do treino",
    }
}

const fn en_message(kind: FormIssueKind, severity: Severity) -> &'static str {
    use FormIssueKind as K;
    use Severity as S;
    match (kind, severity) {
        (K::KneeOverToes, S::Minor) => "Great rhythm! Keep your knees just a little further back 👍",
        (K::KneeOverToes, S::Moderate) => "You're doing well! Focus on pushing your hips back 💪",
        (K::KneeOverToes, S::Significant) => {
            "Let's adjust together, {champion}: sit back as if into a chair 🪑"
        }
        (K::BackRounding, S::Minor) => "Almost perfect! Keep your chest up ✨",
        (K::BackRounding, S::Moderate) => "Nice work! Looking ahead helps your posture 👀",
        (K::BackRounding, S::Significant) => {
            "You've got this, {warrior}! Picture a string lifting your chest 🎯"
        }
        (K::InsufficientDepth, S::Minor) => "Excellent! Go a touch deeper when it feels comfortable 🌟",
        (K::InsufficientDepth, S::Moderate) => "Very good! A little deeper with every rep 📈",
        (K::InsufficientDepth, S::Significant) => "Keep going! Range comes with practice 🚀",
        (K::Asymmetry, S::Minor) => "Good form! Spread your weight evenly on both sides ⚖️",
        (K::Asymmetry, S::Moderate) => "You're improving! Keep both sides level 🎯",
        (K::Asymmetry, S::Significant) => "Let's balance out: pay attention to both sides 💫",
        (K::ElbowFlare, S::Minor) => "Nearly there! Elbows a bit closer to your body 💪",
        (K::ElbowFlare, S::Moderate) => "Strong work! Aim for elbows at about 45 degrees 📐",
        (K::ElbowFlare, S::Significant) => {
            "Let's adjust, {champion}: elbows pointing back, not out ➡️"
        }
        (K::HipSag, S::Minor) => "Solid base! Keep your hips in line ✨",
        (K::HipSag, S::Moderate) => "Core on! Lift your hips a little 🎯",
        (K::HipSag, S::Significant) => {
            "You can do it, {warrior}! One straight line from head to heels 📏"
        }
        (K::NeckStrain, S::Minor) => "Good posture! Keep your neck relaxed and neutral 👍",
        (K::NeckStrain, S::Moderate) => "Relax your neck! Fix your gaze on a spot on the floor 👀",
        (K::NeckStrain, S::Significant) => "Look after your neck! Keep your head in line with your spine 🦒",
        (K::PaceTooFast, S::Minor) => "Great energy! Try a slightly more controlled pace ⏱️",
        (K::PaceTooFast, S::Moderate) => "Love the enthusiasm! Slower reps pay off more 🏆",
        (K::PaceTooFast, S::Significant) => "Easy, {champion}! Quality over quantity 🐢",
        (K::LimitedRange, S::Minor) => "Good start! Your range will grow over time 📈",
        (K::LimitedRange, S::Moderate) => "Progress is progress! Keep practicing 💪",
        (K::LimitedRange, S::Significant) => {
            "A little better every day, {master}! Respect your limits 🌱"
        }
    }
}

const fn en_correction(kind: FormIssueKind) -> &'static str {
    match kind {
        FormIssueKind::KneeOverToes => "Push your hips back before bending your knees",
        FormIssueKind::BackRounding => "Chest up, eyes forward",
        FormIssueKind::InsufficientDepth => "Lower until your thighs are parallel to the floor",
        FormIssueKind::Asymmetry => "Spread your weight evenly across both feet",
        FormIssueKind::ElbowFlare => "Keep your elbows at 45 degrees to your body",
        FormIssueKind::HipSag => "Brace your abs and squeeze your glutes",
        FormIssueKind::NeckStrain => "Eyes down, neck neutral",
        FormIssueKind::PaceTooFast => "Count 2 seconds down and 2 seconds up",
        FormIssueKind::LimitedRange => "Stretch before your workout",
    }
}
