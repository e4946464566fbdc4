use chattymarkov_core::chain::engine::ChattyMarkov;
use chattymarkov_core::database::Database;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Connect to a volatile in-memory backend. Other supported schemes:
    // "json:///path/to/db.json" for file persistence,
    // "redis://host:port;db=N;password=..." or
    // "redis:///path/to/socket.sock;db=N" for a shared redis store.
    let mut markov = ChattyMarkov::connect("memory://")?;

    // Learn a couple of sentences, then replay their transition
    // statistics as a random walk.
    markov.learn("My favorite animal is the crocodile")?;
    markov.learn("The word animal is six letters long")?;
    println!("Generated: {}", markov.generate()?);

    // Namespaces keep independent corpora apart on one backend.
    markov.learn_in("the quick brown fox jumps over the lazy dog", "pangrams")?;
    println!("Generated (pangrams): {}", markov.generate_in("pangrams")?);

    // The backend also offers a scalar get/set escape hatch, unused by
    // the chain algorithm itself.
    markov.database_mut().set("last-run", "today")?;
    println!("last-run = {:?}", markov.database_mut().get("last-run")?);

    // Invalid connection strings fail construction, never learn/generate.
    match ChattyMarkov::connect("not-a-connection-string") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Expected configuration error: {}", e),
    }
    match ChattyMarkov::connect("carrier-pigeon://coop") {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Expected configuration error: {}", e),
    }

    Ok(())
}
