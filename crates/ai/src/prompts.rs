//! Prompt templates for the article generator.
//!
//! The audience is the Brazilian general public, so the prompts are written
//! in Portuguese. The document text is truncated before templating to stay
//! inside the model's context budget.

use plenario_core::proposition::Proposition;

/// Maximum characters of extracted PDF text included in the prompt.
pub const MAX_DOCUMENT_CHARS: usize = 8_000;

pub const SYSTEM_PROMPT: &str = "\
Você é um jornalista especializado em traduzir documentos legislativos \
complexos em notícias acessíveis para o cidadão comum brasileiro.

Seu objetivo é:
1. Explicar o que a proposta quer mudar na prática
2. Mostrar impactos diretos na vida das pessoas
3. Usar linguagem clara, sem jargões jurídicos
4. Ser imparcial mas engajador
5. Conectar a lei abstrata com o cotidiano das pessoas

REGRAS IMPORTANTES:
- Use linguagem simples e direta
- Evite termos técnicos ou explique-os quando necessário
- Foque em COMO isso afeta o cidadão comum
- Não use tom sensacionalista
- Seja factual e preciso";

/// Truncate to at most `max` characters, respecting codepoint boundaries.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Assemble the user prompt for one proposition.
pub fn build_article_prompt(document_text: &str, proposition: &Proposition) -> String {
    let document_text = truncate_chars(document_text, MAX_DOCUMENT_CHARS);

    format!(
        "\
Com base no documento legislativo abaixo, crie uma matéria jornalística completa.

DOCUMENTO ORIGINAL:
{document_text}

DADOS DA PROPOSIÇÃO:
- Tipo: {kind}
- Número: {reference}
- Autor: {author} ({party}/{uf})
- Data de apresentação: {presented}
- Ementa oficial: {ementa}

REQUISITOS DO CONTEÚDO:

1. TÍTULO (máximo 80 caracteres):
   - Linguagem acessível e clara
   - Foco no impacto real, não no processo legislativo

2. RESUMO (100-150 palavras):
   - O que essa proposta quer mudar?
   - Quem será afetado?
   - Qual o impacto prático na vida das pessoas?

3. MATÉRIA COMPLETA (500-800 palavras):
   a) Lead: responda o quê, quem, quando, onde
   b) Contexto: por que essa proposta surgiu?
   c) Detalhamento: como funcionará na prática?
   d) Impactos: quem ganha e quem perde?
   e) Próximos passos: tramitação esperada
   Use parágrafos curtos, exemplos concretos e tom neutro mas humano.

4. TAGS (até 5): palavras-chave dos temas principais.

5. NÍVEL DE IMPACTO (low, medium, high): quantas pessoas serão afetadas
   e quão profunda é a mudança.

6. PÚBLICO-ALVO: lista dos grupos da sociedade mais afetados
   (por exemplo: estudantes, professores, escolas públicas).",
        kind = proposition.kind,
        reference = proposition.reference(),
        author = proposition.author_name.as_deref().unwrap_or(""),
        party = proposition.author_party.as_deref().unwrap_or(""),
        uf = proposition.author_uf.as_deref().unwrap_or(""),
        presented = proposition.presentation_date.as_deref().unwrap_or(""),
        ementa = proposition.summary.as_deref().unwrap_or(""),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
