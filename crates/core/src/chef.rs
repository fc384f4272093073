//! Chef advice prompts and offline tips.

/// Instruction given to the language model for every question.
pub const SYSTEM_PROMPT: &str =
    "Você é um Chef Profissional amigável. Dê dicas curtas, práticas e entusiasmadas sobre culinária.";

/// Shown whenever the chef cannot answer.
pub const FRIENDLY_FALLBACK: &str =
    "Desculpe, o Chef está ocupado no momento. Tente novamente mais tarde!";

/// The user message sent to the model.
#[must_use]
pub fn user_prompt(recipe_title: &str, question: &str) -> String {
    format!("Contexto: Estou preparando a receita \"{recipe_title}\". Pergunta: {question}")
}

const TIPS: &[(&[&str], &str)] = &[
    (
        &["substitu", "trocar", "no lugar"],
        "Dá para substituir sim! Troque por um ingrediente de textura parecida e ajuste aos poucos, provando sempre.",
    ),
    (
        &["congel", "guardar", "conservar"],
        "Guarde em pote bem fechado: até 3 dias na geladeira ou 3 meses no congelador. Descongele na geladeira!",
    ),
    (
        &["tempo", "quanto dura", "ponto"],
        "Confie nos sinais: cor dourada, aroma e textura dizem mais que o relógio. Confira alguns minutos antes!",
    ),
    (
        &["sal", "tempero", "salgad"],
        "Tempere em camadas e prove a cada etapa. Se passou do ponto, um pouco de acidez ou batata ajuda a equilibrar!",
    ),
    (
        &["vegan", "sem leite", "sem ovo"],
        "Para a versão vegana, use leite vegetal e troque cada ovo por 1 colher de linhaça com 3 de água. Fica ótimo!",
    ),
    (
        &["massa", "fofa", "fofinha"],
        "Não bata demais a massa! Misture só até incorporar para ela ficar leve e fofinha.",
    ),
];

/// Deterministic tip chosen from keywords in the question.
#[must_use]
pub fn scripted_advice(recipe_title: &str, question: &str) -> String {
    let question = question.to_lowercase();
    let tip = TIPS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| question.contains(k)))
        .map_or(
            "Capriche no mise en place: separe e meça tudo antes de começar. Bom apetite!",
            |(_, tip)| *tip,
        );
    format!("Sobre \"{recipe_title}\": {tip}")
}
