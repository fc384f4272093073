//! Starter catalog written into an empty document.

use crate::recipe::{Ingredient, Recipe, Step};
use crate::types::RecipeId;

/// The two recipes every fresh document starts with.
#[must_use]
pub fn starter_recipes() -> Vec<Recipe> {
    vec![pancakes(), acai_bowl()]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|&t| t.to_owned()).collect()
}

fn pancakes() -> Recipe {
    Recipe {
        id: RecipeId::new("1"),
        title: "Panquecas Americanas Fofinhas".to_owned(),
        description: "A receita definitiva para o café da manhã perfeito. Massa leve, aerada e dourada."
            .to_owned(),
        rating: 4.9,
        reviews: 128,
        prep_time: 10,
        cook_time: 15,
        calories: 230,
        difficulty: "Fácil".to_owned(),
        category: "Café da Manhã".to_owned(),
        image: "https://images.unsplash.com/photo-1567620905732-2d1ec7ab7445?auto=format&fit=crop&w=1000&q=80"
            .to_owned(),
        ingredients: vec![
            Ingredient::new("Farinha de trigo", 1.5, "xícaras"),
            Ingredient::new("Açúcar refinado", 2.0, "colheres (sopa)"),
            Ingredient::new("Fermento em pó", 1.0, "colher (sopa)"),
            Ingredient::new("Sal", 0.5, "colher (chá)"),
            Ingredient::new("Leite integral", 1.25, "xícaras"),
            Ingredient::new("Manteiga derretida", 3.0, "colheres (sopa)"),
            Ingredient::new("Ovo grande", 1.0, "unidade"),
            Ingredient::new("Essência de baunilha", 1.0, "colher (chá)"),
        ],
        steps: vec![
            Step::new(
                "Misture os secos",
                "Em uma tigela grande, peneire a farinha, o açúcar, o fermento e o sal.",
            ),
            Step::new(
                "Prepare os líquidos",
                "Em outro recipiente, bata levemente o ovo com leite, manteiga e baunilha.",
            ),
            Step::new(
                "União suave",
                "Incorpore os líquidos aos secos sem bater demais.",
            ),
            Step::new(
                "Cozimento",
                "Frite em fogo médio-baixo até surgirem bolhas.",
            ),
        ],
        tags: tags(&["Café da Manhã", "Americano", "Fácil"]),
        author_id: None,
        created_at: None,
    }
}

fn acai_bowl() -> Recipe {
    Recipe {
        id: RecipeId::new("2"),
        title: "Bowl de Açaí Energético".to_owned(),
        description: "O lanche pós-treino ideal, rico em antioxidantes e sabor natural.".to_owned(),
        rating: 4.7,
        reviews: 85,
        prep_time: 5,
        cook_time: 0,
        calories: 310,
        difficulty: "Muito Fácil".to_owned(),
        category: "Lanche".to_owned(),
        image: "https://images.unsplash.com/photo-1590301157890-4810ed352733?auto=format&fit=crop&w=1000&q=80"
            .to_owned(),
        ingredients: vec![
            Ingredient::new("Polpa de açaí", 200.0, "g"),
            Ingredient::new("Banana", 1.0, "unidade"),
            Ingredient::new("Granola", 0.5, "xícara"),
            Ingredient::new("Mel ou Agave", 1.0, "colher (sopa)"),
        ],
        steps: vec![
            Step::new(
                "Bater",
                "Bata o açaí congelado com metade da banana até ficar cremoso.",
            ),
            Step::new(
                "Montar",
                "Coloque em um bowl e cubra com o restante das frutas e granola.",
            ),
        ],
        tags: tags(&["Saudável", "Energia", "Vegano"]),
        author_id: None,
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_catalog() {
        let recipes = starter_recipes();
        let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(recipes.first().map(|r| r.category.as_str()), Some("Café da Manhã"));
        assert_eq!(recipes.get(1).map(|r| r.category.as_str()), Some("Lanche"));
        assert!(recipes.iter().all(|r| !r.ingredients.is_empty()));
    }
}
